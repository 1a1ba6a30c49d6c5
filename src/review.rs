#[cfg(test)]
use std::cell::RefCell;

#[cfg(test)]
thread_local! {
    static TEST_LAST_OPEN: RefCell<Option<String>> = RefCell::new(None);
}

#[cfg(test)]
pub(crate) fn take_test_open() -> Option<String> {
    TEST_LAST_OPEN.with(|slot| slot.borrow_mut().take())
}

// A blocked popup yields no handle or an already-closed one; fall back to
// navigating the current context.
pub(crate) fn open_review(url: &str) {
    #[cfg(test)]
    {
        TEST_LAST_OPEN.with(|slot| {
            *slot.borrow_mut() = Some(url.to_string());
        });
    }
    #[cfg(not(test))]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.open_with_url_and_target(url, "_blank") {
            Ok(Some(handle)) if !handle.closed().unwrap_or(true) => {}
            _ => {
                gloo::console::warn!("review popup blocked, navigating instead");
                navigate_current(&window, url);
            }
        }
    }
}

#[cfg(not(test))]
fn navigate_current(window: &web_sys::Window, url: &str) {
    if window.location().set_href(url).is_err() {
        gloo::console::warn!("review redirect failed", url.to_string());
    }
}
