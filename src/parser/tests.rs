use super::*;

fn page(body_rows: &str) -> String {
    format!(
        "<html><body>\
         <h2>Расписание занятий</h2>\
         <table class=\"schedule\">\
         <thead><tr><th>Время</th><th>Понедельник</th><th>Вторник</th>\
         <th>Среда</th><th>Четверг</th><th>Пятница</th><th>Суббота</th></tr></thead>\
         <tbody>{body_rows}</tbody></table></body></html>"
    )
}

fn empty_tail(count: usize) -> String {
    "<td></td>".repeat(count)
}

#[test]
fn test_parse_single_lesson() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td><div class=\"lesson\">Математический анализ, лек., 3-202, Иванов И.И.</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    assert_eq!(grid.days.len(), WEEKDAY_COUNT);
    assert_eq!(grid.days[0].slots.len(), SLOT_COUNT);

    let lessons = &grid.days[0].slots[0].lessons;
    assert_eq!(lessons.len(), 1);
    let lesson = &lessons[0];
    assert_eq!(lesson.subject, "Математический анализ");
    assert_eq!(lesson.kind, LessonKind::Lecture);
    assert_eq!(lesson.location.as_deref(), Some("3-202"));
    assert_eq!(lesson.counterpart.as_deref(), Some("Иванов И.И."));
    assert_eq!(lesson.recurrence, Recurrence::EveryWeek);
    assert!(lesson.leftover.is_empty());

    // Every other cell stays empty but present.
    assert!(grid.days[1..].iter().all(|day| day
        .slots
        .iter()
        .all(|cell| cell.lessons.is_empty())));
}

#[test]
fn test_parity_pair_in_one_cell() {
    let html = page(&format!(
        "<tr><td>09:35 - 10:55</td><td></td>\
         <td><div class=\"lesson\">Физика, лаб., 2-115, Петров П.П., чет. нед.</div>\
         <div class=\"lesson\">Химия, лаб., 2-117, Кузнецова А.А., неч. нед.</div></td>\
         {}</tr>",
        empty_tail(4)
    ));
    let grid = parse(&html).unwrap();

    let lessons = &grid.days[1].slots[1].lessons;
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].recurrence, Recurrence::EvenWeek);
    assert_eq!(lessons[0].kind, LessonKind::Lab);
    assert_eq!(lessons[1].recurrence, Recurrence::OddWeek);
    assert_eq!(lessons[1].subject, "Химия");
}

#[test]
fn test_explicit_date_list() {
    let html = page(&format!(
        "<tr><td>13:10 - 14:30</td>\
         <td><div class=\"lesson\">Спецкурс, пр., 4-101, Сидоров С.С., [04.09, 25.09, 15.01]</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    let lesson = &grid.days[0].slots[3].lessons[0];
    assert_eq!(lesson.kind, LessonKind::Practice);
    assert_eq!(
        lesson.recurrence,
        Recurrence::Dates(vec![
            PartialDate {
                day: 4,
                month: 9,
                year: None
            },
            PartialDate {
                day: 25,
                month: 9,
                year: None
            },
            PartialDate {
                day: 15,
                month: 1,
                year: None
            },
        ])
    );
    assert!(lesson.leftover.is_empty());
}

#[test]
fn test_explicit_year_in_date_list() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td><div class=\"lesson\">Консультация, [15.01.2024]</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    let lesson = &grid.days[0].slots[0].lessons[0];
    assert_eq!(
        lesson.recurrence,
        Recurrence::Dates(vec![PartialDate {
            day: 15,
            month: 1,
            year: Some(2024)
        }])
    );
}

#[test]
fn test_malformed_cell_keeps_remainder() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td><div class=\"lesson\">Экономика, лек., 1-301, Смирнова О.В., ???, подгруппа Б</div></td>\
         <td><div class=\"lesson\">История, пр., 1-205, Волков Д.А.</div></td>\
         {}</tr>",
        empty_tail(4)
    ));
    let grid = parse(&html).unwrap();

    // The degraded cell keeps its extra tokens instead of failing the page.
    let degraded = &grid.days[0].slots[0].lessons[0];
    assert_eq!(degraded.subject, "Экономика");
    assert_eq!(degraded.leftover, "???; подгруппа Б");

    // The neighbor cell is unaffected.
    let clean = &grid.days[1].slots[0].lessons[0];
    assert_eq!(clean.subject, "История");
    assert!(clean.leftover.is_empty());
}

#[test]
fn test_unreadable_date_token_degrades() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td><div class=\"lesson\">Семинар, пр., [04.09, 99.99, завтра]</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    let lesson = &grid.days[0].slots[0].lessons[0];
    assert_eq!(
        lesson.recurrence,
        Recurrence::Dates(vec![PartialDate {
            day: 4,
            month: 9,
            year: None
        }])
    );
    assert_eq!(lesson.leftover, "99.99; завтра");
}

#[test]
fn test_inline_cell_without_block_markup() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td>Философия, лек., 5-110, Орлова Е.Н.</td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    let lesson = &grid.days[0].slots[0].lessons[0];
    assert_eq!(lesson.subject, "Философия");
    assert_eq!(lesson.kind, LessonKind::Lecture);
}

#[test]
fn test_slot_resolved_by_time_cell() {
    // A page listing only the third slot still lands in slot index 2.
    let html = page(&format!(
        "<tr><td>11:35 - 12:55</td>\
         <td><div class=\"lesson\">Алгебра, пр., 3-404, Белов Н.Н.</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    assert!(grid.days[0].slots[0].lessons.is_empty());
    assert_eq!(grid.days[0].slots[2].lessons.len(), 1);
}

#[test]
fn test_structure_not_found() {
    let html = "<html><body><p>Сервис временно недоступен</p></body></html>";
    assert!(matches!(parse(html), Err(ParseError::StructureNotFound)));

    // A table without a weekday header is not a timetable either.
    let html = "<html><body><table><tr><td>x</td><td>y</td></tr></table></body></html>";
    assert!(matches!(parse(html), Err(ParseError::StructureNotFound)));
}

#[test]
fn test_empty_page_grid_is_padded() {
    let html = page("");
    let grid = parse(&html).unwrap();
    assert_eq!(grid.days.len(), WEEKDAY_COUNT);
    assert!(grid
        .days
        .iter()
        .all(|day| day.slots.len() == SLOT_COUNT
            && day.slots.iter().all(|cell| cell.lessons.is_empty())));
}

#[test]
fn test_dates_take_precedence_over_parity_marker() {
    let html = page(&format!(
        "<tr><td>08:00 - 09:20</td>\
         <td><div class=\"lesson\">Практикум, пр., чет. нед., [04.09]</div></td>\
         {}</tr>",
        empty_tail(5)
    ));
    let grid = parse(&html).unwrap();

    let lesson = &grid.days[0].slots[0].lessons[0];
    assert!(matches!(lesson.recurrence, Recurrence::Dates(_)));
    // The now-redundant parity marker is preserved for inspection.
    assert_eq!(lesson.leftover, "чет. нед.");
}
