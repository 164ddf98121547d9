use crate::app_context::AppContext;
use crate::notifier::TelegramDispatcher;

mod config_reload;
mod monitor;

pub fn start_background_jobs(dispatcher: TelegramDispatcher, app_context: AppContext) {
    monitor::start_monitor_job(dispatcher, app_context.clone());
    config_reload::start_config_hot_reload_job(app_context);
}
