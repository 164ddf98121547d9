use chrono::{DateTime, Utc};

use crate::monitor::{Language, MessageFormat, MetricKind, Severity};

/// Pure message construction; no transport concerns here.
pub fn alert_message(
    language: Language,
    format: MessageFormat,
    metric: MetricKind,
    severity: Severity,
    value: f32,
    threshold: f32,
    fired_at: DateTime<Utc>,
) -> String {
    let marker = match severity {
        Severity::Critical => "🚨",
        Severity::Warning => "⚠️",
    };
    let unit = metric.unit();

    match format {
        MessageFormat::Compact => format!(
            "{} {} {}: {:.1}{} ({} {:.1}{})",
            marker,
            severity_label(language, severity),
            metric.label(),
            value,
            unit,
            threshold_word(language),
            threshold,
            unit,
        ),
        MessageFormat::Detailed => match language {
            Language::En => format!(
                "{} {} ALERT\n\nMetric: {}\nCurrent value: {:.1}{}\nThreshold: {:.1}{}\nTime: {}\n\nPlease check your system!",
                marker,
                severity_label(language, severity),
                metric.label(),
                value,
                unit,
                threshold,
                unit,
                fired_at.format("%Y-%m-%d %H:%M:%S UTC"),
            ),
            Language::Ru => format!(
                "{} {}\n\nМетрика: {}\nТекущее значение: {:.1}{}\nПорог: {:.1}{}\nВремя: {}\n\nПроверьте систему!",
                marker,
                severity_label(language, severity),
                metric.label(),
                value,
                unit,
                threshold,
                unit,
                fired_at.format("%Y-%m-%d %H:%M:%S UTC"),
            ),
        },
    }
}

pub fn test_message(language: Language) -> String {
    match language {
        Language::En => {
            "✅ Test message\n\nIf you can read this, Telegram notifications are working correctly."
                .to_string()
        }
        Language::Ru => {
            "✅ Тестовое сообщение\n\nЕсли вы это видите, уведомления Telegram работают корректно."
                .to_string()
        }
    }
}

fn severity_label(language: Language, severity: Severity) -> &'static str {
    match (language, severity) {
        (Language::En, Severity::Warning) => "WARNING",
        (Language::En, Severity::Critical) => "CRITICAL",
        (Language::Ru, Severity::Warning) => "ПРЕДУПРЕЖДЕНИЕ",
        (Language::Ru, Severity::Critical) => "КРИТИЧНО",
    }
}

fn threshold_word(language: Language) -> &'static str {
    match language {
        Language::En => "threshold",
        Language::Ru => "порог",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::monitor::{Language, MessageFormat, MetricKind, Severity};

    use super::{alert_message, test_message};

    #[test]
    fn detailed_message_carries_value_threshold_and_unit() {
        let message = alert_message(
            Language::En,
            MessageFormat::Detailed,
            MetricKind::Temperature,
            Severity::Critical,
            88.4,
            85.0,
            Utc::now(),
        );

        assert!(message.contains("🚨"));
        assert!(message.contains("CRITICAL"));
        assert!(message.contains("88.4°C"));
        assert!(message.contains("85.0°C"));
    }

    #[test]
    fn compact_message_is_a_single_line() {
        let message = alert_message(
            Language::En,
            MessageFormat::Compact,
            MetricKind::Cpu,
            Severity::Warning,
            84.2,
            80.0,
            Utc::now(),
        );

        assert!(!message.contains('\n'));
        assert!(message.contains("84.2%"));
    }

    #[test]
    fn russian_messages_are_localized() {
        let message = alert_message(
            Language::Ru,
            MessageFormat::Detailed,
            MetricKind::Memory,
            Severity::Warning,
            88.0,
            85.0,
            Utc::now(),
        );
        assert!(message.contains("ПРЕДУПРЕЖДЕНИЕ"));
        assert!(message.contains("Порог"));

        assert!(test_message(Language::Ru).contains("Тестовое"));
        assert!(test_message(Language::En).contains("Test message"));
    }
}
