use chrono::Utc;
use teloxide::{prelude::*, types::ParseMode, utils::command::BotCommands};

use crate::app_context::AppContext;
use crate::monitor::{
    MetricKind, ThresholdConfig, TimeWindow, alert_snapshot, recent_alerts,
};
use crate::notifier::{Dispatcher, TelegramDispatcher, test_message};

const TELEGRAM_TEXT_HARD_LIMIT: usize = 4096;
const TELEGRAM_TEXT_SAFE_LIMIT: usize = 3900;
const TRUNCATE_NOTICE: &str = "\n\n⚠️ (Output was truncated...)";
const DEFAULT_RECENT_LIMIT: usize = 10;
const MAX_RECENT_LIMIT: usize = 50;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum MyCommands {
    #[command(description = "Show help menu.")]
    Help,
    #[command(description = "Show thresholds, notification policy and armed alerts.")]
    Alerts,
    #[command(description = "Show recent alert records, e.g. /recent 20")]
    Recent(String),
    #[command(description = "Update thresholds, e.g. /set cpu 80 95")]
    Set(String),
    #[command(description = "Send a test notification to verify delivery.")]
    Test,
    #[command(description = "Show monitor liveness and dispatch health.")]
    Health,
}

fn is_authorized(msg: &Message, app_context: &AppContext) -> bool {
    let Some(from) = msg.from() else {
        return false;
    };

    let owner_user_id = match app_context.config.owner_user_id() {
        Ok(owner_user_id) => owner_user_id,
        Err(_) => return false,
    };

    let owner_chat_id = match app_context.config.owner_chat_id() {
        Ok(owner_chat_id) => owner_chat_id,
        Err(_) => return false,
    };

    from.id == owner_user_id && msg.chat.id == owner_chat_id
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> &str {
    if input.len() <= max_bytes {
        return input;
    }

    let mut end = max_bytes;
    while !input.is_char_boundary(end) {
        end -= 1;
    }

    &input[..end]
}

fn sanitize_and_truncate(input: &str, max_escaped_len: usize) -> String {
    let escaped_full = html_escape::encode_text(input);
    if escaped_full.len() <= max_escaped_len {
        return escaped_full.into_owned();
    }

    let mut low = 0usize;
    let mut high = input.len();
    let mut best = "";

    while low <= high {
        let mid = (low + high) / 2;
        let candidate = truncate_to_char_boundary(input, mid);
        let escaped = html_escape::encode_text(candidate);

        if escaped.len() <= max_escaped_len {
            best = candidate;
            low = mid + 1;
        } else {
            if mid == 0 {
                break;
            }
            high = mid - 1;
        }
    }

    html_escape::encode_text(best).into_owned()
}

fn as_html_block(title: &str, body: &str) -> String {
    let escaped_title = html_escape::encode_text(title);
    let body_budget = TELEGRAM_TEXT_SAFE_LIMIT.saturating_sub(TRUNCATE_NOTICE.len());
    let mut escaped_body = sanitize_and_truncate(body, body_budget);
    let was_truncated = html_escape::encode_text(body).len() > escaped_body.len();

    if was_truncated {
        escaped_body.push_str(TRUNCATE_NOTICE);
    }

    let message = format!("<b>{}</b>\n<pre>{}</pre>", escaped_title, escaped_body);
    if message.len() > TELEGRAM_TEXT_HARD_LIMIT {
        log::warn!("formatted Telegram message is close to hard limit");
    }
    message
}

fn format_window(window: Option<TimeWindow>) -> String {
    match window {
        Some(window) => format!(
            "{}–{}",
            window.start.format("%H:%M"),
            window.end.format("%H:%M")
        ),
        None => "off".to_string(),
    }
}

fn parse_set_args(args: &str) -> Result<(MetricKind, f32, f32), String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [metric, warning, critical] = parts.as_slice() else {
        return Err("Usage: /set <metric> <warning> <critical>, e.g. /set cpu 80 95".to_string());
    };

    let metric = MetricKind::parse(metric)
        .ok_or_else(|| "Unknown metric. Expected one of: cpu, memory, temperature, frequency".to_string())?;
    let warning = warning
        .parse::<f32>()
        .map_err(|_| format!("Invalid warning level: {:?}", warning))?;
    let critical = critical
        .parse::<f32>()
        .map_err(|_| format!("Invalid critical level: {:?}", critical))?;

    Ok((metric, warning, critical))
}

fn parse_recent_limit(args: &str) -> usize {
    args.trim()
        .parse::<usize>()
        .ok()
        .filter(|limit| *limit > 0)
        .map_or(DEFAULT_RECENT_LIMIT, |limit| limit.min(MAX_RECENT_LIMIT))
}

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: MyCommands,
    app_context: &AppContext,
) -> ResponseResult<()> {
    if !is_authorized(&msg, app_context) {
        let user_id = msg
            .from()
            .map(|user| user.id.0.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        log::warn!(
            "SECURITY: Unauthorized access attempt. user_id={}, chat_id={}, command_text={:?}",
            user_id,
            msg.chat.id.0,
            msg.text()
        );
        return Ok(());
    }

    match cmd {
        MyCommands::Help => {
            bot.send_message(
                msg.chat.id,
                as_html_block("Available commands", &MyCommands::descriptions().to_string()),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        }
        MyCommands::Alerts => {
            let runtime_config = app_context.runtime_config.read().await.clone();
            let snapshot = alert_snapshot(&app_context.alert_state).await;
            let policy = &runtime_config.policy;

            let mut body = String::from("Thresholds:\n");
            for metric in MetricKind::ALL {
                match runtime_config.thresholds.get(metric) {
                    Some(thresholds) => {
                        body.push_str(&format!(
                            "- {}: {} warning {:.1}{} / critical {:.1}{}\n",
                            metric.label(),
                            if thresholds.enabled { "on," } else { "off," },
                            thresholds.warning,
                            metric.unit(),
                            thresholds.critical,
                            metric.unit(),
                        ));
                    }
                    None => {
                        body.push_str(&format!("- {}: unavailable (disabled)\n", metric.label()));
                    }
                }
            }

            body.push_str(&format!(
                "\nPolicy:\n- Notifications: {}\n- Cooldown: {}s\n- Significant change: {:.1}\n- Working hours: {}\n- Quiet hours: {}\n",
                if policy.enabled { "enabled" } else { "disabled" },
                policy.cooldown_secs,
                policy.significant_change_delta,
                format_window(policy.working_hours),
                format_window(policy.quiet_hours),
            ));

            if snapshot.armed.is_empty() {
                body.push_str("\nArmed alerts: none");
            } else {
                body.push_str("\nArmed alerts:\n");
                for (metric, severity) in snapshot.armed {
                    body.push_str(&format!("- {} {}\n", metric.label(), severity));
                }
            }

            bot.send_message(msg.chat.id, as_html_block("Alert Configuration", &body))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        MyCommands::Recent(args) => {
            let limit = parse_recent_limit(&args);
            let records = recent_alerts(&app_context.alert_history, limit).await;

            let body = if records.is_empty() {
                "No alerts recorded yet.".to_string()
            } else {
                records
                    .iter()
                    .map(|record| {
                        format!(
                            "{} {} {} {}: {:.1}{} (threshold {:.1}{}){}",
                            if record.severity == crate::monitor::Severity::Critical {
                                "🚨"
                            } else {
                                "⚠️"
                            },
                            record.fired_at.format("%Y-%m-%d %H:%M:%S"),
                            record.metric.label(),
                            record.severity,
                            record.value,
                            record.metric.unit(),
                            record.threshold,
                            record.metric.unit(),
                            if record.active { " [active]" } else { "" },
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            };

            bot.send_message(msg.chat.id, as_html_block("Recent Alerts", &body))
                .parse_mode(ParseMode::Html)
                .await?;
        }
        MyCommands::Set(args) => {
            let (metric, warning, critical) = match parse_set_args(&args) {
                Ok(parsed) => parsed,
                Err(error) => {
                    bot.send_message(msg.chat.id, as_html_block("Set failed", &error))
                        .parse_mode(ParseMode::Html)
                        .await?;
                    return Ok(());
                }
            };

            let mut runtime_config = app_context.runtime_config.write().await;
            let enabled = runtime_config
                .thresholds
                .get(metric)
                .map_or(true, |thresholds| thresholds.enabled);
            let result = runtime_config.thresholds.set(
                metric,
                ThresholdConfig {
                    enabled,
                    warning,
                    critical,
                },
            );
            drop(runtime_config);

            let message = match result {
                Ok(()) => as_html_block(
                    "Thresholds updated",
                    &format!(
                        "{}: warning {:.1}{} / critical {:.1}{} (applies from the next tick)",
                        metric.label(),
                        warning,
                        metric.unit(),
                        critical,
                        metric.unit(),
                    ),
                ),
                Err(error) => as_html_block("Set failed", &error.to_string()),
            };

            bot.send_message(msg.chat.id, message)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        MyCommands::Test => {
            let language = app_context.runtime_config.read().await.policy.language;
            let owner_chat_id = match app_context.config.owner_chat_id() {
                Ok(chat_id) => chat_id,
                Err(error) => {
                    log::error!("CRITICAL: invalid owner chat id in config: {}", error);
                    return Ok(());
                }
            };

            let dispatcher = TelegramDispatcher::new(bot.clone(), owner_chat_id);
            if let Err(error) = dispatcher.send(&test_message(language)).await {
                log::warn!("test_dispatch_failed error={}", error);
                bot.send_message(
                    msg.chat.id,
                    as_html_block("Test failed", &format!("Delivery error: {}", error)),
                )
                .parse_mode(ParseMode::Html)
                .await?;
            }
        }
        MyCommands::Health => {
            let last_tick = *app_context.last_monitor_tick.lock().await;
            let snapshot = alert_snapshot(&app_context.alert_state).await;
            let monitor_interval = app_context.runtime_config.read().await.monitor_interval;
            let now = Utc::now();
            let threshold_secs = (monitor_interval * 2) as i64;

            let status_line = match last_tick {
                Some(tick) => {
                    let lag_secs = now.signed_duration_since(tick).num_seconds().max(0);
                    if lag_secs > threshold_secs {
                        format!(
                            "⚠️ CRITICAL: Monitor loop is delayed. Last tick: {}s ago (threshold: {}s)",
                            lag_secs, threshold_secs
                        )
                    } else {
                        format!(
                            "✅ Healthy. Last monitor tick: {}s ago (threshold: {}s)",
                            lag_secs, threshold_secs
                        )
                    }
                }
                None => "⏳ Warming up. Monitor loop has not produced the first tick yet."
                    .to_string(),
            };

            let body = format!(
                "{}\n\nMonitor interval: {}s\nConsecutive dispatch failures: {}\nCurrent time: {}",
                status_line,
                monitor_interval,
                snapshot.consecutive_dispatch_failures,
                now.to_rfc3339(),
            );

            bot.send_message(msg.chat.id, as_html_block("Bot Health", &body))
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::monitor::MetricKind;

    use super::{parse_recent_limit, parse_set_args};

    #[test]
    fn set_args_parse_metric_and_levels() {
        let (metric, warning, critical) = parse_set_args("cpu 80 95").expect("valid args");
        assert_eq!(metric, MetricKind::Cpu);
        assert_eq!(warning, 80.0);
        assert_eq!(critical, 95.0);
    }

    #[test]
    fn set_args_reject_malformed_input() {
        assert!(parse_set_args("").is_err());
        assert!(parse_set_args("cpu 80").is_err());
        assert!(parse_set_args("disk 80 95").is_err());
        assert!(parse_set_args("cpu eighty 95").is_err());
    }

    #[test]
    fn recent_limit_defaults_and_caps() {
        assert_eq!(parse_recent_limit(""), 10);
        assert_eq!(parse_recent_limit("20"), 20);
        assert_eq!(parse_recent_limit("500"), 50);
        assert_eq!(parse_recent_limit("0"), 10);
        assert_eq!(parse_recent_limit("garbage"), 10);
    }
}
