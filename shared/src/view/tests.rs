use super::*;
use crate::Priority;
use crate::date::Timestamp;

// =========================================================
// 辅助函数
// =========================================================

fn task(id: &str, title: &str, course_id: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        course_id: course_id.to_string(),
        due_date: None,
        priority: Priority::Medium,
        status: TaskStatus::Active,
    }
}

fn task_with(
    id: &str,
    title: &str,
    priority: Priority,
    due_date: Option<&str>,
    status: TaskStatus,
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        course_id: "c1".to_string(),
        due_date: due_date.map(str::to_string),
        priority,
        status,
    }
}

fn course(id: &str, name: &str) -> Course {
    Course {
        id: id.to_string(),
        course_name: name.to_string(),
        course_code: None,
        color_tag: "#ccc".to_string(),
    }
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}

fn spec() -> ViewSpec {
    ViewSpec::default()
}

// =========================================================
// 归档分区测试
// =========================================================

#[test]
fn archive_toggle_partitions_are_disjoint_and_exhaustive() {
    let tasks = vec![
        task_with("1", "a", Priority::Low, None, TaskStatus::Active),
        task_with("2", "b", Priority::Low, None, TaskStatus::Complete),
        task_with("3", "c", Priority::Low, None, TaskStatus::Active),
        task_with("4", "d", Priority::Low, None, TaskStatus::Complete),
    ];

    let active_view = derive_view(&tasks, &ViewSpec::default());
    let archived_view = derive_view(
        &tasks,
        &ViewSpec {
            show_archived: true,
            ..ViewSpec::default()
        },
    );

    let mut union: Vec<&str> = ids(&active_view);
    union.extend(ids(&archived_view));
    union.sort();
    assert_eq!(union, vec!["1", "2", "3", "4"]);

    // 互斥：没有任务同时出现在两个视图
    for t in &active_view {
        assert!(!archived_view.iter().any(|a| a.id == t.id));
    }
}

#[test]
fn toggling_status_moves_a_task_between_partitions() {
    let mut tasks = vec![
        task("1", "a", "c1"),
        task_with("2", "b", Priority::Low, None, TaskStatus::Active),
    ];

    let toggled = tasks[1].with_toggled_status();
    assert_eq!(toggled.status, TaskStatus::Complete);
    // 除 status 外其余字段不变
    assert_eq!(toggled.id, tasks[1].id);
    assert_eq!(toggled.title, tasks[1].title);
    assert_eq!(toggled.priority, tasks[1].priority);
    assert_eq!(toggled.due_date, tasks[1].due_date);
    assert_eq!(toggled.course_id, tasks[1].course_id);

    assert!(reconcile_updated(&mut tasks, toggled));

    let active_view = derive_view(&tasks, &spec());
    let archived_view = derive_view(
        &tasks,
        &ViewSpec {
            show_archived: true,
            ..spec()
        },
    );
    assert_eq!(ids(&active_view), vec!["1"]);
    assert_eq!(ids(&archived_view), vec!["2"]);

    // 再翻转一次回到进行中视图
    let back = tasks[1].with_toggled_status();
    reconcile_updated(&mut tasks, back);
    assert_eq!(ids(&derive_view(&tasks, &spec())), vec!["1", "2"]);
}

// =========================================================
// 课程过滤测试
// =========================================================

#[test]
fn course_filter_keeps_only_matching_tasks() {
    let tasks = vec![
        task("1", "a", "c1"),
        task("2", "b", "c2"),
        task("3", "c", "c1"),
    ];

    let filtered = derive_view(
        &tasks,
        &ViewSpec {
            selected_course: CourseFilter::Course("c1".to_string()),
            ..spec()
        },
    );
    assert_eq!(ids(&filtered), vec!["1", "3"]);

    let all = derive_view(&tasks, &spec());
    assert_eq!(all.len(), 3);
}

#[test]
fn course_name_lookup_tolerates_dangling_references() {
    let courses = vec![course("c1", "Biology"), course("c2", "Linear Algebra")];
    assert_eq!(course_name_for(&courses, "c2"), "Linear Algebra");
    assert_eq!(course_name_for(&courses, "deleted"), UNKNOWN_COURSE_NAME);
    assert_eq!(course_name_for(&[], "c1"), UNKNOWN_COURSE_NAME);
}

// =========================================================
// 排序测试
// =========================================================

#[test]
fn sorts_by_title_in_both_directions() {
    let tasks = vec![
        task("1", "Calculus homework", "c1"),
        task("2", "Art essay", "c1"),
        task("3", "Biology lab", "c1"),
    ];

    let asc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::Title,
            ..spec()
        },
    );
    assert_eq!(ids(&asc), vec!["2", "3", "1"]);

    let desc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Descending,
            ..spec()
        },
    );
    assert_eq!(ids(&desc), vec!["1", "3", "2"]);
}

#[test]
fn missing_due_dates_sort_as_the_epoch() {
    let tasks = vec![
        task_with("dated", "a", Priority::Low, Some("2025-01-01T00:00:00Z"), TaskStatus::Active),
        task_with("undated", "b", Priority::Low, None, TaskStatus::Active),
    ];

    let asc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::DueDate,
            ..spec()
        },
    );
    assert_eq!(ids(&asc), vec!["undated", "dated"]);

    let desc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::DueDate,
            sort_direction: SortDirection::Descending,
            ..spec()
        },
    );
    assert_eq!(ids(&desc), vec!["dated", "undated"]);
}

#[test]
fn sorts_by_priority_ordinal() {
    // [B/Low/无日期, A/High/有日期] 按优先级降序 -> [2, 1]
    let tasks = vec![
        task_with("1", "B", Priority::Low, None, TaskStatus::Active),
        task_with("2", "A", Priority::High, Some("2025-06-01T00:00:00Z"), TaskStatus::Active),
    ];

    let desc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::Priority,
            sort_direction: SortDirection::Descending,
            ..spec()
        },
    );
    assert_eq!(ids(&desc), vec!["2", "1"]);

    let asc = derive_view(
        &tasks,
        &ViewSpec {
            sort_key: SortKey::Priority,
            ..spec()
        },
    );
    assert_eq!(ids(&asc), vec!["1", "2"]);
}

#[test]
fn equal_keys_preserve_input_order() {
    let tasks = vec![
        task_with("1", "Same", Priority::Medium, None, TaskStatus::Active),
        task_with("2", "Same", Priority::Medium, None, TaskStatus::Active),
        task_with("3", "Same", Priority::Medium, None, TaskStatus::Active),
    ];

    for key in [SortKey::Title, SortKey::DueDate, SortKey::Priority] {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let view = derive_view(
                &tasks,
                &ViewSpec {
                    sort_key: key,
                    sort_direction: direction,
                    ..spec()
                },
            );
            assert_eq!(ids(&view), vec!["1", "2", "3"], "{key:?}/{direction:?}");
        }
    }
}

// =========================================================
// 回放测试 (Reconciliation)
// =========================================================

#[test]
fn created_entities_are_appended() {
    let mut tasks = vec![task("1", "a", "c1")];
    reconcile_created(&mut tasks, task("2", "b", "c1"));
    assert_eq!(ids(&tasks), vec!["1", "2"]);
}

#[test]
fn updates_replace_in_place_without_reordering() {
    let mut tasks = vec![
        task("1", "a", "c1"),
        task("2", "b", "c1"),
        task("3", "c", "c1"),
    ];

    let mut renamed = task("2", "renamed", "c1");
    renamed.priority = Priority::High;
    assert!(reconcile_updated(&mut tasks, renamed));

    assert_eq!(ids(&tasks), vec!["1", "2", "3"]);
    assert_eq!(tasks[1].title, "renamed");
    assert_eq!(tasks[1].priority, Priority::High);

    // 未知 id 不改动集合
    assert!(!reconcile_updated(&mut tasks, task("missing", "x", "c1")));
    assert_eq!(tasks.len(), 3);
}

#[test]
fn removal_by_id() {
    let mut tasks = vec![task("1", "a", "c1"), task("2", "b", "c1")];
    assert!(reconcile_removed(&mut tasks, "1"));
    assert_eq!(ids(&tasks), vec!["2"]);
    assert!(!reconcile_removed(&mut tasks, "1"));
}

#[test]
fn deleting_a_course_cascades_to_its_tasks() {
    let mut courses = vec![course("c1", "Biology"), course("c2", "History")];
    let mut tasks = vec![
        task("1", "a", "c1"),
        task("2", "b", "c2"),
        task("3", "c", "c1"),
    ];
    let mut view_spec = ViewSpec {
        selected_course: CourseFilter::Course("c1".to_string()),
        ..spec()
    };

    reconcile_course_removed(&mut courses, &mut tasks, &mut view_spec, "c1");

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, "c2");
    assert_eq!(ids(&tasks), vec!["2"]);
    // 过滤器指向被删课程时重置为全部
    assert_eq!(view_spec.selected_course, CourseFilter::All);
}

#[test]
fn deleting_an_unselected_course_keeps_the_filter() {
    let mut courses = vec![course("c1", "Biology"), course("c2", "History")];
    let mut tasks = vec![task("1", "a", "c1"), task("2", "b", "c2")];
    let mut view_spec = ViewSpec {
        selected_course: CourseFilter::Course("c1".to_string()),
        ..spec()
    };

    reconcile_course_removed(&mut courses, &mut tasks, &mut view_spec, "c2");

    assert_eq!(
        view_spec.selected_course,
        CourseFilter::Course("c1".to_string())
    );
    assert_eq!(ids(&tasks), vec!["1"]);
}

// =========================================================
// 提醒分区测试
// =========================================================

const HOUR_MS: i64 = 60 * 60 * 1000;

#[test]
fn reminders_split_overdue_and_due_soon() {
    let now = Timestamp::new(100 * HOUR_MS);
    let tasks = vec![
        // 1 小时前到期 -> overdue
        task_with("late", "a", Priority::Low, Some("1970-01-05T03:00:00Z"), TaskStatus::Active),
        // 12 小时后到期 -> due soon
        task_with("soon", "b", Priority::Low, Some("1970-01-05T16:00:00Z"), TaskStatus::Active),
        // 3 天后到期 -> 不提醒
        task_with("far", "c", Priority::Low, Some("1970-01-08T04:00:00Z"), TaskStatus::Active),
        // 无截止日期 -> 不提醒
        task_with("undated", "d", Priority::Low, None, TaskStatus::Active),
        // 已归档的逾期任务 -> 不提醒
        task_with("done", "e", Priority::Low, Some("1970-01-01T00:00:00Z"), TaskStatus::Complete),
    ];

    let reminders = partition_reminders(&tasks, now);
    assert_eq!(ids(&reminders.overdue), vec!["late"]);
    assert_eq!(ids(&reminders.due_soon), vec!["soon"]);
    assert!(!reminders.is_empty());
}

#[test]
fn reminder_window_boundaries() {
    let now = Timestamp::new(0);

    // 恰好现在到期：算 due soon，不算 overdue
    let at_now = vec![task_with(
        "now",
        "a",
        Priority::Low,
        Some("1970-01-01T00:00:00Z"),
        TaskStatus::Active,
    )];
    let r = partition_reminders(&at_now, now);
    assert!(r.overdue.is_empty());
    assert_eq!(ids(&r.due_soon), vec!["now"]);

    // 恰好 24 小时后到期：仍在窗口内
    let at_horizon = vec![task_with(
        "edge",
        "a",
        Priority::Low,
        Some("1970-01-02T00:00:00Z"),
        TaskStatus::Active,
    )];
    let r = partition_reminders(&at_horizon, now);
    assert_eq!(ids(&r.due_soon), vec!["edge"]);

    // 24 小时零 1 秒后：窗口外
    let past_horizon = vec![task_with(
        "out",
        "a",
        Priority::Low,
        Some("1970-01-02T00:00:01Z"),
        TaskStatus::Active,
    )];
    let r = partition_reminders(&past_horizon, now);
    assert!(r.is_empty());
}
