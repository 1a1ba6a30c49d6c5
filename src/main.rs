mod app_router;
mod boot_runtime;
mod core;
mod dispatch;
mod flow_runtime;
mod input;
mod review;
mod yew_app;

use yew_app::App;

fn main() {
    console_error_panic_hook::set_once();
    boot_runtime::set_phase("mount", "starting ui");
    yew::Renderer::<App>::new().render();
}
