//! Operator-facing messages.

use crate::error::DashboardError;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn error_prefix(self) -> &'static str {
        match self {
            Locale::En => "An error occurred during processing",
            Locale::Ar => "حدث خطأ أثناء المعالجة",
        }
    }

    pub fn length_mismatch(self, expected: usize) -> String {
        match self {
            Locale::En => format!("Each signal must contain exactly {} points.", expected),
            Locale::Ar => format!("يجب أن تحتوي كل إشارة على {} نقطة بالضبط.", expected),
        }
    }

    pub fn raw_output(self) -> &'static str {
        match self {
            Locale::En => "Raw model output:",
            Locale::Ar => "الناتج الخام من النموذج:",
        }
    }

    pub fn empty_result(self) -> &'static str {
        match self {
            Locale::En => "The model returned no ABP data.",
            Locale::Ar => "النموذج لم يرجع بيانات ABP.",
        }
    }

    pub fn success(self) -> &'static str {
        match self {
            Locale::En => "Prediction succeeded!",
            Locale::Ar => "تم التوقّع بنجاح!",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Locale::En => "ABP chart",
            Locale::Ar => "الرسم البياني للـ ABP",
        }
    }

    pub fn x_label(self) -> &'static str {
        "Time Frame"
    }

    pub fn y_label(self) -> &'static str {
        "ABP Value"
    }

    pub fn render_failed(self) -> &'static str {
        match self {
            Locale::En => "Could not draw the chart",
            Locale::Ar => "تعذّر رسم المخطط",
        }
    }

    pub fn saved(self, path: &Path) -> String {
        match self {
            Locale::En => format!("Result saved as JSON: {}", path.display()),
            Locale::Ar => format!("تم حفظ النتيجة كملف JSON: {}", path.display()),
        }
    }

    /// Full message shown to the operator for a failed prediction.
    pub fn describe(self, error: &DashboardError) -> String {
        match error {
            DashboardError::Length { expected, .. } => self.length_mismatch(*expected),
            other => format!("{}: {}", self.error_prefix(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_is_verbatim() {
        let error = DashboardError::Service("Missing required field(s): ppg".to_string());
        assert_eq!(
            Locale::En.describe(&error),
            "An error occurred during processing: Missing required field(s): ppg"
        );
        assert!(Locale::Ar
            .describe(&error)
            .ends_with("Missing required field(s): ppg"));
    }

    #[test]
    fn test_length_mismatch_is_localized() {
        let error = DashboardError::Length {
            expected: 250,
            ppg: 3,
            ecg: 250,
        };
        assert_eq!(
            Locale::En.describe(&error),
            "Each signal must contain exactly 250 points."
        );
        assert!(Locale::Ar.describe(&error).contains("250"));
    }
}
