use coursework_shared::Task;
use coursework_shared::date::Timestamp;
use coursework_shared::view::partition_reminders;
use leptos::prelude::*;

/// 到期提醒横幅：过期任务与 24 小时内到期的任务
///
/// 两个分区都为空时整个横幅不渲染。
#[component]
pub fn RemindersBanner(#[prop(into)] tasks: Signal<Vec<Task>>) -> impl IntoView {
    let reminders = Memo::new(move |_| partition_reminders(&tasks.get(), Timestamp::now()));

    view! {
        <Show when=move || !reminders.get().is_empty()>
            <div class="grid md:grid-cols-2 gap-4">
                <Show when=move || !reminders.get().overdue.is_empty()>
                    <div class="alert alert-error flex-col items-start">
                        <h4 class="font-bold">"Past Due"</h4>
                        <ul class="list-disc list-inside text-sm">
                            <For
                                each=move || reminders.get().overdue
                                key=|task| task.id.clone()
                                children=|task| view! { <li>{task.title}</li> }
                            />
                        </ul>
                    </div>
                </Show>
                <Show when=move || !reminders.get().due_soon.is_empty()>
                    <div class="alert alert-warning flex-col items-start">
                        <h4 class="font-bold">"Due Soon (24 Hours)"</h4>
                        <ul class="list-disc list-inside text-sm">
                            <For
                                each=move || reminders.get().due_soon
                                key=|task| task.id.clone()
                                children=|task| view! { <li>{task.title}</li> }
                            />
                        </ul>
                    </div>
                </Show>
            </div>
        </Show>
    }
}
