use colored::{Color, ColoredString, Colorize};

use crate::analytics::GradeBucket;
use batchmark_webclient::{JobStatus, RecordStatus};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    match v.as_str() {
        "truecolor" | "24bit" => true,
        _ => false,
    }
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for JobStatus {
    fn color(&self) -> Color {
        use JobStatus::*;
        match self {
            Pending => Color::Yellow,
            Processing => Color::Cyan,
            Completed => Color::Green,
            Failed => Color::Red,
        }
    }
}

impl ColorTheme for RecordStatus {
    fn color(&self) -> Color {
        use RecordStatus::*;
        match self {
            Pending => Color::BrightBlack,
            Grading => Color::Yellow,
            Graded => Color::Green,
            Error => Color::Red,
        }
    }
}

impl ColorTheme for GradeBucket {
    fn color(&self) -> Color {
        use GradeBucket::*;
        if !self::is_truecolor_supported() {
            return match self {
                A => Color::Green,
                B => Color::Cyan,
                C => Color::Yellow,
                D => Color::Red,
                F => Color::Magenta,
            };
        }

        match self {
            A => Color::TrueColor {
                r: 16,
                g: 185,
                b: 129,
            },
            B => Color::TrueColor {
                r: 6,
                g: 182,
                b: 212,
            },
            C => Color::TrueColor {
                r: 245,
                g: 158,
                b: 11,
            },
            D => Color::TrueColor {
                r: 239,
                g: 68,
                b: 68,
            },
            F => Color::TrueColor {
                r: 220,
                g: 38,
                b: 38,
            },
        }
    }
}

/// Uppercase badge in the status color, e.g. ` COMPLETED `.
pub fn status_badge(status: JobStatus) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", status.to_string().to_uppercase())
        .on_color(status.color())
        .bold()
        .color(fg)
}

pub fn record_marker(status: RecordStatus) -> ColoredString {
    "●".color(status.color())
}

pub fn bucket_label(bucket: GradeBucket) -> ColoredString {
    format!("{} ({})", bucket, bucket.range_label())
        .color(bucket.color())
        .bold()
}
