use coursework_shared::Course;
use coursework_shared::view::CourseFilter;
use leptos::prelude::*;

/// 课程侧栏：课程过滤选择 + 单个课程的编辑/删除入口
#[component]
pub fn Sidebar(
    #[prop(into)] courses: Signal<Vec<Course>>,
    #[prop(into)] selected: Signal<CourseFilter>,
    #[prop(into)] on_select: Callback<CourseFilter>,
    #[prop(into)] on_edit: Callback<Course>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    view! {
        <aside class="card bg-base-100 shadow-xl w-full md:w-64 shrink-0">
            <div class="card-body p-4">
                <h2 class="card-title text-base">"Courses"</h2>
                <ul class="menu p-0">
                    <li>
                        <a
                            class=move || if selected.get() == CourseFilter::All { "active" } else { "" }
                            on:click=move |_| on_select.run(CourseFilter::All)
                        >
                            "All Tasks"
                        </a>
                    </li>
                    <For
                        each=move || courses.get()
                        key=|course| course.id.clone()
                        children=move |course| {
                            let id = course.id.clone();
                            let select_id = course.id.clone();
                            let delete_id = course.id.clone();
                            let edit_course = course.clone();
                            let color = course.color_tag.clone();
                            view! {
                                <li>
                                    <div class="flex items-center justify-between gap-2">
                                        <a
                                            class=move || if selected.get().is_course(&id) { "active flex-1" } else { "flex-1" }
                                            on:click=move |_| on_select.run(CourseFilter::Course(select_id.clone()))
                                        >
                                            <span
                                                class="inline-block w-3 h-3 rounded-full"
                                                style=format!("background-color: {}", color)
                                            ></span>
                                            {course.course_name.clone()}
                                            {course.course_code.clone().map(|code| view! {
                                                <span class="text-xs opacity-50">{code}</span>
                                            })}
                                        </a>
                                        <button
                                            class="btn btn-ghost btn-xs"
                                            on:click=move |_| on_edit.run(edit_course.clone())
                                        >
                                            "Edit"
                                        </button>
                                        <button
                                            class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| on_delete.run(delete_id.clone())
                                        >
                                            "Delete"
                                        </button>
                                    </div>
                                </li>
                            }
                        }
                    />
                </ul>
            </div>
        </aside>
    }
}
