#[cfg(test)]
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    HtmlElement, HtmlInputElement, HtmlTextAreaElement, MouseEvent, PointerEvent, SubmitEvent,
};
use yew::prelude::*;

use crate::app_router;
use crate::boot_runtime;
use crate::core::*;
use crate::dispatch;
use crate::flow_runtime::FlowCore;
use crate::input::sample_rating;
use crate::review;
#[cfg(test)]
use hyoka_core::flow::FlowState;
use hyoka_core::flow::{FlowAction, FlowEffect, Step};
use hyoka_core::{DispatchRequest, Feedback};

const RATING_TAGLINE: &str = "Your opinion helps us improve every day.";
const FORM_TITLE: &str = "Tell us what happened";
const COMMENT_PLACEHOLDER: &str = "Write about your experience...";
const CONTACT_PLACEHOLDER: &str = "Email or phone (optional)";
const SUCCESS_TITLE: &str = "Thank you!";
const SUCCESS_POSITIVE_NOTE: &str =
    "We appreciate you taking the time to rate us publicly.";
const SUCCESS_NEGATIVE_NOTE: &str =
    "Your message went straight to the owner. Thanks for helping us improve.";

#[cfg(test)]
#[derive(Clone)]
pub(crate) struct FlowTestHooks {
    pub(crate) run_action: Rc<dyn Fn(FlowAction)>,
    pub(crate) begin_submit: Rc<dyn Fn(String, String)>,
    pub(crate) snapshot: Rc<dyn Fn() -> FlowState>,
}

#[cfg(test)]
thread_local! {
    static FLOW_TEST_HOOKS: RefCell<Option<FlowTestHooks>> = RefCell::new(None);
    static TEST_LAST_ALERT: RefCell<Option<String>> = RefCell::new(None);
}

#[cfg(test)]
fn set_flow_test_hooks(hooks: FlowTestHooks) {
    FLOW_TEST_HOOKS.with(|slot| {
        *slot.borrow_mut() = Some(hooks);
    });
}

#[cfg(test)]
fn clear_flow_test_hooks() {
    FLOW_TEST_HOOKS.with(|slot| slot.borrow_mut().take());
}

#[cfg(test)]
pub(crate) fn flow_test_hooks() -> Option<FlowTestHooks> {
    FLOW_TEST_HOOKS.with(|slot| slot.borrow().clone())
}

#[cfg(test)]
fn take_test_alert() -> Option<String> {
    TEST_LAST_ALERT.with(|slot| slot.borrow_mut().take())
}

fn notify_failure() {
    #[cfg(test)]
    {
        TEST_LAST_ALERT.with(|slot| {
            *slot.borrow_mut() = Some(SUBMIT_FAILURE_MESSAGE.to_string());
        });
    }
    #[cfg(not(test))]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let _ = window.alert_with_message(SUBMIT_FAILURE_MESSAGE);
    }
}

#[function_component(App)]
pub(crate) fn app() -> Html {
    let config = use_memo((), |_| app_router::load_widget_config());
    let flow = use_memo((), |_| FlowCore::new());
    let step = use_state(|| Step::Rating);
    let rating = use_state(|| RATING_UNSET);
    let submitting = use_state(|| false);
    let pointer_active = use_mut_ref(|| false);
    let control_ref = use_node_ref();
    let comment_ref = use_node_ref();
    let contact_ref = use_node_ref();

    let sync_view: Rc<dyn Fn()> = {
        let flow = (*flow).clone();
        let step = step.clone();
        let rating = rating.clone();
        let submitting = submitting.clone();
        Rc::new(move || {
            let snapshot = flow.snapshot();
            step.set(snapshot.step);
            rating.set(snapshot.rating);
            submitting.set(snapshot.submitting);
        })
    };

    let run_flow: Rc<dyn Fn(FlowAction)> = {
        let flow = (*flow).clone();
        let sync_view = sync_view.clone();
        let config = config.clone();
        Rc::new(move |action| {
            let effect = flow.dispatch(action);
            sync_view();
            let Some(effect) = effect else {
                return;
            };
            match effect {
                FlowEffect::OpenReview => review::open_review(&config.review_url),
                FlowEffect::RevealForm => {
                    let flow = flow.clone();
                    let sync_view = sync_view.clone();
                    spawn_local(async move {
                        TimeoutFuture::new(FORM_REVEAL_DELAY_MS).await;
                        flow.dispatch(FlowAction::ShowForm);
                        sync_view();
                    });
                }
                FlowEffect::NotifyFailure => notify_failure(),
            }
        })
    };

    let begin_submit: Rc<dyn Fn(String, String)> = {
        let flow = (*flow).clone();
        let run_flow = run_flow.clone();
        let config = config.clone();
        Rc::new(move |comment: String, contact: String| {
            let snapshot = flow.snapshot();
            if !snapshot.can_submit() {
                return;
            }
            let feedback = match Feedback::new(snapshot.rating, &comment, &contact) {
                Ok(feedback) => feedback,
                Err(error) => {
                    gloo::console::warn!("feedback rejected", error.to_string());
                    return;
                }
            };
            let request = DispatchRequest::from_feedback(&feedback);
            run_flow(FlowAction::SubmitStarted);
            let run_flow = run_flow.clone();
            let endpoint = config.dispatch_url.clone();
            spawn_local(async move {
                let delivered = dispatch::send(&endpoint, &request).await;
                run_flow(FlowAction::SubmitFinished { delivered });
            });
        })
    };

    #[cfg(test)]
    {
        let run_flow = run_flow.clone();
        let begin_submit = begin_submit.clone();
        let flow = (*flow).clone();
        use_effect_with((), move |_| {
            set_flow_test_hooks(FlowTestHooks {
                run_action: run_flow,
                begin_submit,
                snapshot: Rc::new(move || flow.snapshot()),
            });
            || {
                clear_flow_test_hooks();
            }
        });
    }

    {
        let pointer_active = pointer_active.clone();
        let run_flow = run_flow.clone();
        use_effect_with((), move |_| {
            boot_runtime::ready();
            let commit_listener = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| {
                    let pointer_active = pointer_active.clone();
                    let run_flow = run_flow.clone();
                    EventListener::new(&document, "pointerup", move |_| {
                        if !*pointer_active.borrow() {
                            return;
                        }
                        *pointer_active.borrow_mut() = false;
                        run_flow(FlowAction::RateCommit);
                    })
                });
            let cancel_listener = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| {
                    EventListener::new(&document, "pointercancel", move |_| {
                        if !*pointer_active.borrow() {
                            return;
                        }
                        *pointer_active.borrow_mut() = false;
                        run_flow(FlowAction::RateAbandon);
                    })
                });
            move || {
                drop(commit_listener);
                drop(cancel_listener);
            }
        });
    }

    let on_pointer_down = {
        let pointer_active = pointer_active.clone();
        let control_ref = control_ref.clone();
        let run_flow = run_flow.clone();
        Callback::from(move |event: PointerEvent| {
            if !event.is_primary() {
                return;
            }
            let Some(control) = control_ref.cast::<HtmlElement>() else {
                return;
            };
            event.prevent_default();
            // Touch implicitly captures the pointer; release it so leave
            // events still fire when the finger slides off the control.
            let _ = control.release_pointer_capture(event.pointer_id());
            *pointer_active.borrow_mut() = true;
            if let Some(value) = sample_rating(&control, event.client_x() as f32) {
                run_flow(FlowAction::RateSample { value });
            }
        })
    };

    let on_pointer_move = {
        let pointer_active = pointer_active.clone();
        let control_ref = control_ref.clone();
        let run_flow = run_flow.clone();
        Callback::from(move |event: PointerEvent| {
            if !event.is_primary() || !*pointer_active.borrow() {
                return;
            }
            let Some(control) = control_ref.cast::<HtmlElement>() else {
                return;
            };
            if let Some(value) = sample_rating(&control, event.client_x() as f32) {
                run_flow(FlowAction::RateSample { value });
            }
        })
    };

    let on_pointer_leave = {
        let pointer_active = pointer_active.clone();
        let run_flow = run_flow.clone();
        Callback::from(move |event: PointerEvent| {
            if !event.is_primary() || !*pointer_active.borrow() {
                return;
            }
            run_flow(FlowAction::RateAbandon);
        })
    };

    let on_back = {
        let run_flow = run_flow.clone();
        Callback::from(move |_: MouseEvent| {
            run_flow(FlowAction::Back);
        })
    };

    let on_submit = {
        let begin_submit = begin_submit.clone();
        let comment_ref = comment_ref.clone();
        let contact_ref = contact_ref.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(comment_input) = comment_ref.cast::<HtmlTextAreaElement>() else {
                return;
            };
            let contact_value = contact_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            begin_submit(comment_input.value(), contact_value);
        })
    };

    let on_restart = Callback::from(move |_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().reload();
        }
    });

    let step_value = *step;
    let rating_value = *rating;
    let submitting_value = *submitting;

    let body = match step_value {
        Step::Rating => {
            let stars: Html = (RATING_MIN..=RATING_MAX)
                .map(|star| {
                    let class = if rating_value >= star {
                        "star star-filled"
                    } else {
                        "star"
                    };
                    html! { <span class={class}>{ "★" }</span> }
                })
                .collect();
            html! {
                <div class="screen screen-rating">
                    <span class="badge">{ "Feedback" }</span>
                    <h1>{ format!("How was your visit to {}?", config.business_name) }</h1>
                    <p class="tagline">{ RATING_TAGLINE }</p>
                    <div
                        class="star-row"
                        ref={control_ref.clone()}
                        onpointerdown={on_pointer_down}
                        onpointermove={on_pointer_move}
                        onpointerleave={on_pointer_leave}
                    >
                        { stars }
                    </div>
                </div>
            }
        }
        Step::Form => html! {
            <div class="screen screen-form">
                <div class="form-header">
                    <button class="back" onclick={on_back} disabled={submitting_value}>
                        { "\u{2190}" }
                    </button>
                    <h2>{ FORM_TITLE }</h2>
                </div>
                <form onsubmit={on_submit}>
                    <textarea
                        ref={comment_ref.clone()}
                        required={true}
                        placeholder={COMMENT_PLACEHOLDER}
                    />
                    <input
                        ref={contact_ref.clone()}
                        type="text"
                        placeholder={CONTACT_PLACEHOLDER}
                    />
                    <button type="submit" disabled={submitting_value}>
                        { if submitting_value { "Sending..." } else { "Send private comment" } }
                    </button>
                </form>
            </div>
        },
        Step::Success => {
            let note = if branch_for(rating_value) == Branch::Positive {
                SUCCESS_POSITIVE_NOTE
            } else {
                SUCCESS_NEGATIVE_NOTE
            };
            html! {
                <div class="screen screen-success">
                    <div class="success-mark">{ "\u{2713}" }</div>
                    <h2>{ SUCCESS_TITLE }</h2>
                    <p class="note">{ note }</p>
                    <button class="restart" onclick={on_restart}>{ "Back to start" }</button>
                </div>
            }
        }
    };

    html! {
        <main class="widget">
            <div class="card">{ body }</div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_router::{build_dispatch_url, parse_query_overrides};
    use crate::dispatch::{clear_test_dispatch, install_test_dispatch};
    use crate::input::{control_span, sample_rating, HasClientRect};
    use console_error_panic_hook::set_once as set_panic_hook;
    use js_sys::Date;
    use std::cell::Cell;
    use wasm_bindgen_test::*;
    use web_sys::DomRect;

    wasm_bindgen_test_configure!(run_in_browser);

    struct FixedRect {
        left: f64,
        width: f64,
    }

    impl HasClientRect for FixedRect {
        fn client_rect(&self) -> DomRect {
            DomRect::new_with_x_and_y_and_width_and_height(self.left, 0.0, self.width, 48.0)
                .expect("dom rect")
        }
    }

    async fn mount_and_hooks() -> FlowTestHooks {
        set_panic_hook();
        let document = web_sys::window()
            .and_then(|window| window.document())
            .expect("document available");
        let root = document.create_element("div").expect("create test root");
        document
            .body()
            .expect("body available")
            .append_child(&root)
            .expect("append test root");
        let _handle = yew::Renderer::<App>::with_root(root).render();
        let start = Date::now();
        loop {
            if let Some(hooks) = flow_test_hooks() {
                return hooks;
            }
            if Date::now() - start > 5000.0 {
                panic!("flow hooks not set after 5s");
            }
            TimeoutFuture::new(10).await;
        }
    }

    async fn reach_form(hooks: &FlowTestHooks, rating: u8) {
        (hooks.run_action)(FlowAction::RateSample { value: rating });
        (hooks.run_action)(FlowAction::RateCommit);
        TimeoutFuture::new(FORM_REVEAL_DELAY_MS + 100).await;
        assert_eq!((hooks.snapshot)().step, Step::Form);
    }

    #[wasm_bindgen_test]
    fn sample_rating_maps_bands() {
        let rect = FixedRect {
            left: 100.0,
            width: 500.0,
        };
        assert_eq!(sample_rating(&rect, 550.0), Some(5));
        assert_eq!(sample_rating(&rect, 150.0), Some(1));
        assert_eq!(sample_rating(&rect, 40.0), Some(1));
        assert_eq!(sample_rating(&rect, 900.0), Some(5));

        let collapsed = FixedRect {
            left: 100.0,
            width: 0.0,
        };
        assert!(control_span(&collapsed).is_none());
        assert_eq!(sample_rating(&collapsed, 300.0), None);
    }

    #[wasm_bindgen_test]
    fn query_overrides_parse_and_join() {
        let overrides = parse_query_overrides("?review=https://r.example&business=Cafe%20Sol");
        assert_eq!(overrides.review.as_deref(), Some("https://r.example"));
        assert_eq!(overrides.business.as_deref(), Some("Cafe Sol"));
        assert_eq!(overrides.dispatch, None);

        assert_eq!(
            build_dispatch_url("https://relay.example/"),
            "https://relay.example/api/feedback"
        );
    }

    #[wasm_bindgen_test]
    async fn positive_commit_opens_review_and_succeeds() {
        let hooks = mount_and_hooks().await;
        let _ = review::take_test_open();

        (hooks.run_action)(FlowAction::RateSample { value: 5 });
        (hooks.run_action)(FlowAction::RateCommit);

        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Success);
        assert!(review::take_test_open().is_some());
    }

    #[wasm_bindgen_test]
    async fn negative_commit_reveals_form_after_the_delay() {
        let hooks = mount_and_hooks().await;

        (hooks.run_action)(FlowAction::RateSample { value: 2 });
        (hooks.run_action)(FlowAction::RateCommit);
        assert_eq!((hooks.snapshot)().step, Step::Rating);

        TimeoutFuture::new(FORM_REVEAL_DELAY_MS + 100).await;
        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Form);
        assert_eq!(snapshot.rating, 2);
    }

    #[wasm_bindgen_test]
    async fn abandoned_selection_commits_nothing() {
        let hooks = mount_and_hooks().await;
        let _ = review::take_test_open();

        (hooks.run_action)(FlowAction::RateSample { value: 5 });
        (hooks.run_action)(FlowAction::RateAbandon);
        (hooks.run_action)(FlowAction::RateCommit);

        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Rating);
        assert_eq!(snapshot.rating, 0);
        assert!(review::take_test_open().is_none());
    }

    #[wasm_bindgen_test]
    async fn successful_submit_sends_once_and_succeeds() {
        let hooks = mount_and_hooks().await;
        reach_form(&hooks, 1).await;

        let sent = Rc::new(RefCell::new(Vec::<DispatchRequest>::new()));
        {
            let sent = sent.clone();
            install_test_dispatch(Rc::new(move |request| {
                sent.borrow_mut().push(request);
                true
            }));
        }

        (hooks.begin_submit)("slow service".to_string(), String::new());
        TimeoutFuture::new(20).await;

        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Success);
        assert!(!snapshot.submitting);
        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].rating, 1);
        assert_eq!(sent[0].comment, "slow service");
        assert_eq!(sent[0].contact, None);
        clear_test_dispatch();
    }

    #[wasm_bindgen_test]
    async fn failed_submit_alerts_and_stays_on_the_form() {
        let hooks = mount_and_hooks().await;
        reach_form(&hooks, 2).await;
        let _ = take_test_alert();

        let calls = Rc::new(Cell::new(0u32));
        {
            let calls = calls.clone();
            install_test_dispatch(Rc::new(move |_| {
                calls.set(calls.get() + 1);
                false
            }));
        }

        (hooks.begin_submit)("cold food".to_string(), "555-0199".to_string());
        TimeoutFuture::new(20).await;

        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Form);
        assert!(snapshot.can_submit());
        assert_eq!(calls.get(), 1);
        assert_eq!(take_test_alert().as_deref(), Some(SUBMIT_FAILURE_MESSAGE));
        clear_test_dispatch();
    }

    #[wasm_bindgen_test]
    async fn empty_comment_never_reaches_dispatch() {
        let hooks = mount_and_hooks().await;
        reach_form(&hooks, 3).await;

        let calls = Rc::new(Cell::new(0u32));
        {
            let calls = calls.clone();
            install_test_dispatch(Rc::new(move |_| {
                calls.set(calls.get() + 1);
                true
            }));
        }

        (hooks.begin_submit)("   ".to_string(), String::new());
        TimeoutFuture::new(20).await;

        let snapshot = (hooks.snapshot)();
        assert_eq!(snapshot.step, Step::Form);
        assert_eq!(calls.get(), 0);
        clear_test_dispatch();
    }

    #[wasm_bindgen_test]
    fn wasm_smoke() {
        set_panic_hook();
        assert_eq!(1 + 1, 2);
    }
}
