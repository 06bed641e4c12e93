//! 任务视图引擎 (Collection View Engine)
//!
//! 纯函数层：给定原始任务/课程集合与过滤排序条件，派生出要渲染的有序
//! 列表；并在本地集合上回放服务端确认过的增删改（reconciliation）。
//! 不依赖任何 UI 或浏览器 API，可直接单元测试。

use crate::date::{Timestamp, due_timestamp_or_epoch};
use crate::{Course, Task, TaskStatus, UNKNOWN_COURSE_NAME};
use std::cmp::Ordering;
use std::time::Duration;

// =========================================================
// 过滤与排序条件 (Filter/Sort Spec)
// =========================================================

/// 课程过滤：全部任务或单个课程
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CourseFilter {
    #[default]
    All,
    Course(String),
}

impl CourseFilter {
    pub fn matches(&self, course_id: &str) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Course(id) => id == course_id,
        }
    }

    pub fn is_course(&self, course_id: &str) -> bool {
        matches!(self, CourseFilter::Course(id) if id == course_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    #[default]
    DueDate,
    Priority,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::DueDate => "dueDate",
            SortKey::Priority => "priority",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "title" => SortKey::Title,
            "priority" => SortKey::Priority,
            _ => SortKey::DueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "descending" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// 视图条件。UI 本地状态，不持久化。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSpec {
    pub selected_course: CourseFilter,
    /// true 只显示已完成（归档）任务，false 只显示进行中任务
    pub show_archived: bool,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

// =========================================================
// 视图派生 (Derivation)
// =========================================================

/// 派生渲染列表：归档过滤 -> 课程过滤 -> 稳定排序
///
/// 归档开关把任务集合切成互斥且完备的两半：每个任务恰好在其中一个
/// 开关状态下可见。排序相等的任务保持输入顺序（稳定排序）。
pub fn derive_view(tasks: &[Task], spec: &ViewSpec) -> Vec<Task> {
    let visible = if spec.show_archived {
        TaskStatus::Complete
    } else {
        TaskStatus::Active
    };

    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| task.status == visible)
        .filter(|task| spec.selected_course.matches(&task.course_id))
        .cloned()
        .collect();

    view.sort_by(|a, b| {
        let ordering = match spec.sort_key {
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::DueDate => due_timestamp_or_epoch(a.due_date.as_deref())
                .cmp(&due_timestamp_or_epoch(b.due_date.as_deref())),
            SortKey::Priority => a.priority.ordinal().cmp(&b.priority.ordinal()),
        };
        match spec.sort_direction {
            SortDirection::Ascending => ordering,
            // reverse() 保持 Equal 不变，稳定性不受影响
            SortDirection::Descending => ordering.reverse(),
        }
    });

    view
}

/// 课程名查找；引用失效（课程被并发删除）时返回占位名而不是报错
pub fn course_name_for(courses: &[Course], course_id: &str) -> String {
    courses
        .iter()
        .find(|course| course.id == course_id)
        .map(|course| course.course_name.clone())
        .unwrap_or_else(|| UNKNOWN_COURSE_NAME.to_string())
}

// =========================================================
// 本地集合回放 (Reconciliation)
// =========================================================

/// 课程与任务统一通过 id 回放变更
pub trait Identified {
    fn entity_id(&self) -> &str;
}

impl Identified for Course {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

impl Identified for Task {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

/// 创建：把服务端确认后的实体追加到集合末尾
pub fn reconcile_created<T: Identified>(items: &mut Vec<T>, created: T) {
    items.push(created);
}

/// 更新：按 id 原位替换，不改变集合顺序。返回是否找到。
pub fn reconcile_updated<T: Identified>(items: &mut [T], updated: T) -> bool {
    match items
        .iter()
        .position(|item| item.entity_id() == updated.entity_id())
    {
        Some(index) => {
            items[index] = updated;
            true
        }
        None => false,
    }
}

/// 删除：按 id 移除。返回是否找到。
pub fn reconcile_removed<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.entity_id() != id);
    items.len() != before
}

/// 删除课程：级联移除其全部任务；若当前课程过滤正指向它，重置为全部
pub fn reconcile_course_removed(
    courses: &mut Vec<Course>,
    tasks: &mut Vec<Task>,
    spec: &mut ViewSpec,
    course_id: &str,
) {
    reconcile_removed(courses, course_id);
    tasks.retain(|task| task.course_id != course_id);
    if spec.selected_course.is_course(course_id) {
        spec.selected_course = CourseFilter::All;
    }
}

// =========================================================
// 到期提醒 (Reminders)
// =========================================================

/// "Due Soon" 窗口：24 小时
pub const DUE_SOON_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reminders {
    pub overdue: Vec<Task>,
    pub due_soon: Vec<Task>,
}

impl Reminders {
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.due_soon.is_empty()
    }
}

/// 提醒分区：只看进行中且有可解析截止时间的任务。
///
/// - overdue: 截止时间严格早于 now
/// - due_soon: 截止时间落在 [now, now + 24h] 内
pub fn partition_reminders(tasks: &[Task], now: Timestamp) -> Reminders {
    let horizon = now + DUE_SOON_WINDOW;
    let mut reminders = Reminders::default();

    for task in tasks {
        if task.status != TaskStatus::Active {
            continue;
        }
        let Some(due) = task.due_date.as_deref().and_then(crate::date::parse_timestamp) else {
            continue;
        };
        match due.cmp(&now) {
            Ordering::Less => reminders.overdue.push(task.clone()),
            _ if due <= horizon => reminders.due_soon.push(task.clone()),
            _ => {}
        }
    }

    reminders
}

#[cfg(test)]
mod tests;
