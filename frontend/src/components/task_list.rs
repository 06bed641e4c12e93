use coursework_shared::date::display_due_date;
use coursework_shared::view::course_name_for;
use coursework_shared::{Course, Task, TaskStatus};
use leptos::prelude::*;

/// 派生后的任务列表（表格渲染）
///
/// 列表本身不做任何过滤排序，收到什么渲染什么；顺序由视图引擎决定。
#[component]
pub fn TaskList(
    #[prop(into)] tasks: Signal<Vec<Task>>,
    #[prop(into)] courses: Signal<Vec<Course>>,
    #[prop(into)] on_toggle: Callback<Task>,
    #[prop(into)] on_edit: Callback<Task>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th></th>
                        <th>"Task"</th>
                        <th>"Due Date"</th>
                        <th>"Course"</th>
                        <th class="hidden md:table-cell">"Priority"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || tasks.get().is_empty()>
                        <tr>
                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                <h3 class="font-bold">"You're all caught up!"</h3>
                                <p>"No tasks to display for this course."</p>
                            </td>
                        </tr>
                    </Show>
                    <For
                        each=move || tasks.get()
                        key=|task| (task.id.clone(), task.status)
                        children=move |task| {
                            let toggle_task = task.clone();
                            let edit_task = task.clone();
                            let delete_id = task.id.clone();
                            let course_id = task.course_id.clone();
                            let done = task.status == TaskStatus::Complete;
                            let priority_badge = match task.priority {
                                coursework_shared::Priority::High => "badge badge-error badge-outline",
                                coursework_shared::Priority::Medium => "badge badge-warning badge-outline",
                                coursework_shared::Priority::Low => "badge badge-ghost",
                            };
                            view! {
                                <tr>
                                    <td>
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-sm"
                                            prop:checked=done
                                            on:change=move |_| on_toggle.run(toggle_task.clone())
                                        />
                                    </td>
                                    <td>
                                        <div class=move || if done { "line-through opacity-50" } else { "" }>
                                            <span class="font-bold">{task.title.clone()}</span>
                                            {task.description.clone().map(|text| view! {
                                                <p class="text-sm opacity-70">{text}</p>
                                            })}
                                        </div>
                                    </td>
                                    <td>{display_due_date(task.due_date.as_deref())}</td>
                                    <td>
                                        {move || course_name_for(&courses.get(), &course_id)}
                                    </td>
                                    <td class="hidden md:table-cell">
                                        <span class=priority_badge>
                                            {task.priority.as_str()}
                                        </span>
                                    </td>
                                    <td class="text-right">
                                        <button
                                            class="btn btn-ghost btn-xs"
                                            on:click=move |_| on_edit.run(edit_task.clone())
                                        >
                                            "Edit"
                                        </button>
                                        <button
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| on_delete.run(delete_id.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}
