use coursework_shared::Course;
use coursework_shared::protocol::{CreateCourseRequest, UpdateCourseRequest};
use leptos::prelude::*;

// =========================================================
// 颜色标签 (Color Tags)
// =========================================================

/// HSL 转 `#rrggbb`（h 0..360，s/l 为百分比）
fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    let l = l / 100.0;
    let a = s * l.min(1.0 - l) / 100.0;
    let f = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * color).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", f(0.0), f(8.0), f(4.0))
}

/// 随机生成一个柔和的默认颜色标签
fn random_pastel_color() -> String {
    let hue = (js_sys::Math::random() * 360.0).floor();
    hsl_to_hex(hue, 70.0, 85.0)
}

/// 空的选填字段按缺省处理
fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

// =========================================================
// 表单状态
// =========================================================

/// 课程表单状态；`RwSignal` 实现 Copy，便于在闭包间传递
#[derive(Clone, Copy)]
struct CourseFormState {
    course_name: RwSignal<String>,
    course_code: RwSignal<String>,
    color_tag: RwSignal<String>,
}

impl CourseFormState {
    fn new() -> Self {
        Self {
            course_name: RwSignal::new(String::new()),
            course_code: RwSignal::new(String::new()),
            color_tag: RwSignal::new(random_pastel_color()),
        }
    }

    fn from_course(course: &Course) -> Self {
        Self {
            course_name: RwSignal::new(course.course_name.clone()),
            course_code: RwSignal::new(course.course_code.clone().unwrap_or_default()),
            color_tag: RwSignal::new(course.color_tag.clone()),
        }
    }

    fn reset(&self) {
        self.course_name.set(String::new());
        self.course_code.set(String::new());
        self.color_tag.set(random_pastel_color());
    }

    fn to_create_request(self) -> CreateCourseRequest {
        CreateCourseRequest {
            course_name: self.course_name.get(),
            course_code: optional(self.course_code.get()),
            color_tag: self.color_tag.get(),
        }
    }

    fn to_update_request(self, id: String) -> UpdateCourseRequest {
        UpdateCourseRequest {
            id,
            course_name: self.course_name.get(),
            course_code: optional(self.course_code.get()),
            color_tag: self.color_tag.get(),
        }
    }
}

/// 共用的表单字段部分
#[component]
fn CourseFields(form: CourseFormState) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for="course-name">
                <span class="label-text">"Course Name"</span>
            </label>
            <input
                id="course-name"
                type="text"
                on:input=move |ev| form.course_name.set(event_target_value(&ev))
                prop:value=form.course_name
                class="input input-bordered w-full"
                required
            />
        </div>
        <div class="form-control">
            <label class="label" for="course-code">
                <span class="label-text">"Course Code (Optional)"</span>
            </label>
            <input
                id="course-code"
                type="text"
                placeholder="BIO-201"
                on:input=move |ev| form.course_code.set(event_target_value(&ev))
                prop:value=form.course_code
                class="input input-bordered w-full"
            />
        </div>
        <div class="form-control">
            <label class="label" for="color-tag">
                <span class="label-text">"Color Tag"</span>
            </label>
            <input
                id="color-tag"
                type="color"
                on:input=move |ev| form.color_tag.set(event_target_value(&ev))
                prop:value=form.color_tag
                class="w-16 h-10 cursor-pointer"
            />
        </div>
    }
}

// =========================================================
// 对话框组件
// =========================================================

#[component]
pub fn AddCourseDialog(#[prop(into)] on_add: Callback<CreateCourseRequest>) -> impl IntoView {
    let (open, set_open) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let form = CourseFormState::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_add.run(form.to_create_request());
        set_open.set(false);
        form.reset();
    };

    view! {
        <button class="btn btn-primary btn-sm" on:click=move |_| set_open.set(true)>
            "+ Add Course"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Add New Course"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <CourseFields form=form />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">"Add Course"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

#[component]
pub fn EditCourseDialog(
    course: Course,
    #[prop(into)] on_save: Callback<UpdateCourseRequest>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let form = CourseFormState::from_course(&course);
    let course_id = course.id.clone();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_save.run(form.to_update_request(course_id.clone()));
    };

    view! {
        <div class="modal modal-open">
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Edit Course"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <CourseFields form=form />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">"Save Changes"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::hsl_to_hex;

    #[test]
    fn pastel_hues_convert_to_hex() {
        // s=70, l=85 为课程标签的固定饱和度/亮度
        assert_eq!(hsl_to_hex(0.0, 70.0, 85.0), "#f4bebe");
        assert_eq!(hsl_to_hex(120.0, 70.0, 85.0), "#bef4be");
        assert_eq!(hsl_to_hex(240.0, 70.0, 85.0), "#bebef4");
    }

    #[test]
    fn grayscale_ignores_hue() {
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(180.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(90.0, 0.0, 50.0), "#808080");
    }
}
