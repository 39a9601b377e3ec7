//! Medium-style read time estimates.
//!
//! A text is charged one minute per [`DEFAULT_WPM`] words, rounded up, and
//! never less than a minute. HTML input can additionally be charged for the
//! images it embeds.

use regex::Regex;
use std::{fmt, sync::OnceLock};

/// Average adult reading speed in words per minute
pub const DEFAULT_WPM: u32 = 265;

/// Seconds charged for the first image; each following image costs one second
/// less, down to [`MIN_IMAGE_SECONDS`].
const FIRST_IMAGE_SECONDS: u64 = 12;
const MIN_IMAGE_SECONDS: u64 = 3;

fn word_delimiter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+").expect("static regex"))
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"))
}

fn img_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img\b").expect("static regex"))
}

/// An estimated reading duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadTime {
    seconds: u64,
    wpm: u32,
}

impl ReadTime {
    /// Total estimated seconds
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Reading speed the estimate was computed with
    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    /// Whole minutes, rounded up, with a floor of one minute
    pub fn minutes(&self) -> u64 {
        self.seconds.div_ceil(60).max(1)
    }

    /// Human readable form, e.g. `"3 min read"`
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes())
    }
}

/// Number of words as counted by the estimator.
///
/// The trimmed text is split on runs of non-word characters and every piece
/// counts, so trailing punctuation adds one and an empty string counts as one
/// word. `None` counts as zero.
pub fn word_count(text: Option<&str>) -> u64 {
    match text {
        Some(text) => word_delimiter().split(text.trim()).count() as u64,
        None => 0,
    }
}

fn seconds_for(words: u64, images: u64, wpm: u32) -> u64 {
    let wpm = u64::from(wpm.max(1));
    // ceil(words / wpm * 60)
    let mut seconds = (words * 60).div_ceil(wpm);
    let mut delta = FIRST_IMAGE_SECONDS;
    for _ in 0..images {
        seconds += delta;
        if delta > MIN_IMAGE_SECONDS {
            delta -= 1;
        }
    }
    seconds
}

/// Estimate plain text at [`DEFAULT_WPM`]. Markup, if any, is counted as text.
pub fn of_text(text: Option<&str>) -> ReadTime {
    of_text_with_wpm(text, DEFAULT_WPM)
}

/// Estimate plain text at a custom reading speed
pub fn of_text_with_wpm(text: Option<&str>, wpm: u32) -> ReadTime {
    ReadTime {
        seconds: seconds_for(word_count(text), 0, wpm),
        wpm,
    }
}

/// Estimate HTML at [`DEFAULT_WPM`]: tags are stripped before counting and each
/// `<img>` adds image viewing time.
pub fn of_html(html: Option<&str>) -> ReadTime {
    let (words, images) = match html {
        Some(html) => {
            let images = img_tag().find_iter(html).count() as u64;
            let text = html_tag().replace_all(html, " ");
            (word_count(Some(&text)), images)
        }
        None => (0, 0),
    };
    ReadTime {
        seconds: seconds_for(words, images, DEFAULT_WPM),
        wpm: DEFAULT_WPM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn counts_pieces_between_delimiters() {
        assert_eq!(word_count(Some("Hello, world!")), 3);
        assert_eq!(word_count(Some("one two three")), 3);
        assert_eq!(word_count(Some("")), 1);
        assert_eq!(word_count(None), 0);
    }

    #[test]
    fn minimum_is_one_minute() {
        assert_eq!(of_text(None).text(), "1 min read");
        assert_eq!(of_text(Some("")).text(), "1 min read");
        assert_eq!(of_text(Some("short")).seconds(), 1);
        assert_eq!(of_text(Some("short")).minutes(), 1);
    }

    #[test]
    fn scales_with_length() {
        assert_eq!(of_text(Some(&words(265))).seconds(), 60);
        assert_eq!(of_text(Some(&words(265))).text(), "1 min read");
        assert_eq!(of_text(Some(&words(266))).text(), "2 min read");
        assert_eq!(of_text(Some(&words(795))).text(), "3 min read");
        assert_eq!(of_text(Some(&words(2650))).text(), "10 min read");
    }

    #[test]
    fn custom_wpm() {
        let rt = of_text_with_wpm(Some(&words(200)), 100);
        assert_eq!(rt.wpm(), 100);
        assert_eq!(rt.seconds(), 120);
        assert_eq!(rt.to_string(), "2 min read");
    }

    #[test]
    fn html_strips_tags_and_charges_images() {
        let html = format!("<p>{}</p>", words(265));
        assert_eq!(of_html(Some(&html)).seconds(), 60);

        let with_images = format!("{html}<img src=\"a.png\"><IMG src=\"b.png\"/>");
        assert_eq!(of_html(Some(&with_images)).seconds(), 60 + 12 + 11);
        assert_eq!(of_html(Some(&with_images)).text(), "2 min read");
    }

    #[test]
    fn image_charge_bottoms_out() {
        assert_eq!(seconds_for(0, 12, DEFAULT_WPM), (3..=12).sum::<u64>() + 3 * 2);
    }
}
