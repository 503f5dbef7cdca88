//! Terminal rendering of submission results

use crate::controller::SubmissionState;
use crate::form::{InputForm, InputMode};
use repp_common::labels::{field_label, ui_text, UiText};
use repp_common::{Preferences, Prediction, Theme};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const BRIGHT_CYAN: &str = "\x1b[96m";
const BRIGHT_RED: &str = "\x1b[91m";
const RED: &str = "\x1b[31m";

/// Format an amount as rubles: grouped thousands, two decimals
///
/// `10500000.0` → `₽ 10 500 000.00`
pub fn format_rubles(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("₽ {}{}.{}", sign, grouped, fraction)
}

fn highlight(theme: Theme, text: &str) -> String {
    match theme {
        Theme::Light => format!("{}{}{}", BOLD, text, RESET),
        Theme::Dark => format!("{}{}{}", BRIGHT_CYAN, text, RESET),
    }
}

fn alert(theme: Theme, text: &str) -> String {
    match theme {
        Theme::Light => format!("{}{}{}", RED, text, RESET),
        Theme::Dark => format!("{}{}{}", BRIGHT_RED, text, RESET),
    }
}

/// Two-line result block
pub fn render_prediction(prediction: &Prediction, prefs: &Preferences) -> String {
    let locale = prefs.locale();
    format!(
        "{}: {}\n{}: {}",
        ui_text(locale, UiText::PricePerArea),
        highlight(prefs.theme(), &format_rubles(prediction.price_per_area())),
        ui_text(locale, UiText::TotalPrice),
        highlight(prefs.theme(), &format_rubles(prediction.total_price())),
    )
}

/// Whatever the controller currently holds
pub fn render_state(state: &SubmissionState, prefs: &Preferences) -> String {
    let locale = prefs.locale();
    match state {
        SubmissionState::Idle => ui_text(locale, UiText::Idle).to_string(),
        SubmissionState::Submitting => ui_text(locale, UiText::Submitting).to_string(),
        SubmissionState::Success(prediction) => render_prediction(prediction, prefs),
        SubmissionState::Failed(message) => alert(
            prefs.theme(),
            &format!("{}: {}", ui_text(locale, UiText::Failed), message),
        ),
    }
}

/// Summary of the form: active mode plus entered values
pub fn render_form(form: &InputForm, prefs: &Preferences) -> String {
    let locale = prefs.locale();
    let mut lines = Vec::new();

    match form.mode() {
        InputMode::Manual => {
            lines.push(format!("[{}]", ui_text(locale, UiText::ModeManual)));
            for (field, value) in form.record().entries() {
                if !value.is_empty() {
                    lines.push(format!("  {} ({}): {}", field_label(locale, field), field, value));
                }
            }
        }
        InputMode::Link => {
            lines.push(format!("[{}]", ui_text(locale, UiText::ModeLink)));
            if form.link().trim().is_empty() {
                lines.push(format!("  {}", ui_text(locale, UiText::EmptyLink)));
            } else {
                lines.push(format!("  {}", form.link()));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::ErrorMessage;
    use repp_common::AttributeField;

    #[test]
    fn test_format_rubles_groups_thousands() {
        assert_eq!(format_rubles(10500000.0), "₽ 10 500 000.00");
        assert_eq!(format_rubles(150000.0), "₽ 150 000.00");
        assert_eq!(format_rubles(999.5), "₽ 999.50");
        assert_eq!(format_rubles(0.0), "₽ 0.00");
        assert_eq!(format_rubles(-1234.567), "₽ -1 234.57");
    }

    #[test]
    fn test_prediction_labels_follow_locale() {
        let mut prefs = Preferences::new();
        let prediction = Prediction::new(150000.0, 10500000.0);

        let ru = render_prediction(&prediction, &prefs);
        assert!(ru.contains("Цена за м²"));
        assert!(ru.contains("₽ 10 500 000.00"));

        prefs.toggle_locale();
        let en = render_prediction(&prediction, &prefs);
        assert!(en.contains("Total estimated price"));
    }

    #[test]
    fn test_theme_changes_palette_only() {
        let mut prefs = Preferences::new();
        let state = SubmissionState::Failed(ErrorMessage::new("invalid url"));

        let light = render_state(&state, &prefs);
        prefs.toggle_theme();
        let dark = render_state(&state, &prefs);

        assert_ne!(light, dark);
        assert!(light.contains("invalid url") && dark.contains("invalid url"));
        assert!(dark.starts_with(BRIGHT_RED));
    }

    #[test]
    fn test_render_form_lists_only_entered_fields() {
        let prefs = Preferences::new();
        let mut form = InputForm::new();
        form.set_attribute(AttributeField::Floor, "5");

        let text = render_form(&form, &prefs);
        assert!(text.contains("Этаж (Floor): 5"));
        assert!(!text.contains("District"));

        form.set_mode(InputMode::Link);
        assert!(render_form(&form, &prefs).contains("Введите ссылку"));
    }
}
