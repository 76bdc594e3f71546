use std::fmt;
use std::str::FromStr;

pub use rust_i18n::t;

/// Display language for every user-visible string. The set is closed:
/// the catalogs under `locales/` ship exactly these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Es,
    En,
}

/// The source site ships Spanish-first.
pub const DEFAULT_LOCALE: Locale = Locale::Es;

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    pub fn other(self) -> Locale {
        match self {
            Locale::Es => Locale::En,
            Locale::En => Locale::Es,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLocale(pub String);

impl fmt::Display for InvalidLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid locale {:?}, expected \"es\" or \"en\"", self.0)
    }
}

impl std::error::Error for InvalidLocale {}

impl FromStr for Locale {
    type Err = InvalidLocale;

    /// Accepts regional variants (`es-MX`, `en_US`) by language prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.starts_with("es") {
            Ok(Locale::Es)
        } else if lower.starts_with("en") {
            Ok(Locale::En)
        } else {
            Err(InvalidLocale(s.to_string()))
        }
    }
}

/// Resolve `key` against the catalog of `locale`.
///
/// A key with no registered translation comes back verbatim; callers render
/// it as-is instead of failing.
pub fn lookup(locale: Locale, key: &str) -> String {
    let text = t!(key, locale = locale.code());
    // rust-i18n renders a miss as "<locale>.<key>"; collapse to the bare key.
    if text == format!("{}.{key}", locale.code()) {
        key.to_string()
    } else {
        text
    }
}

/// Point the process-global rust-i18n locale (used by bare `t!` calls in the
/// UI) at `locale`. The store calls this on init and on every switch.
pub fn init_locale(locale: Locale) {
    rust_i18n::set_locale(locale.code());
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every key the UI resolves, in catalog order. The coverage test below
    /// keeps both catalogs complete; a key missing from either one would
    /// leak through `lookup`'s raw-key fallback into the rendered screen.
    const UI_KEYS: &[&str] = &[
        "nav.home",
        "nav.tools",
        "nav.installation",
        "nav.use_cases",
        "hero.tag",
        "hero.title1",
        "hero.title2",
        "hero.description",
        "hero.get_started",
        "hero.view_on_github",
        "chat.assistant",
        "chat.question",
        "chat.title",
        "chat.line_chart",
        "chat.live",
        "chat.actual_eps",
        "chat.estimated_eps",
        "chat.latest_eps",
        "chat.last_surprise",
        "chat.beat_rate",
        "chat.beat_of",
        "chat.insights",
        "chat.insight1",
        "chat.insight2",
        "chat.insight3",
        "chat.insight4",
        "use_cases.tag",
        "use_cases.title",
        "use_cases.description",
        "use_cases.demo1",
        "use_cases.demo2",
        "use_cases.demo3",
        "tools.tag",
        "tools.title",
        "tools.description",
        "tools.tool1",
        "tools.tool2",
        "tools.tool3",
        "tools.tool4",
        "tools.tool5",
        "tools.tool6",
        "tools.tool7",
        "tools.new",
        "install.tag",
        "install.title",
        "install.description",
        "install.step1_title",
        "install.step1_desc",
        "install.step2_title",
        "install.step3_title",
        "install.step4_title",
        "install.terminal",
        "footer.documentation",
        "footer.made_with",
        "footer.all_rights",
        "hints.normal",
        "status.section_of",
    ];

    #[test]
    fn returns_registered_string_per_locale() {
        assert_eq!(lookup(Locale::Es, "hero.get_started"), "Comenzar");
        assert_eq!(lookup(Locale::En, "hero.get_started"), "Get Started");
        assert_eq!(lookup(Locale::Es, "chat.actual_eps"), "EPS Real");
        assert_eq!(lookup(Locale::En, "chat.actual_eps"), "Actual EPS");
    }

    #[test]
    fn missing_key_falls_back_to_key_itself() {
        assert_eq!(lookup(Locale::En, "unknown_key"), "unknown_key");
        // Idempotent: asking again yields the same thing.
        assert_eq!(lookup(Locale::En, "unknown_key"), "unknown_key");
        assert_eq!(lookup(Locale::Es, "chat.no_such_entry"), "chat.no_such_entry");
    }

    #[test]
    fn both_catalogs_cover_every_ui_key() {
        for key in UI_KEYS {
            for locale in [Locale::Es, Locale::En] {
                let text = lookup(locale, key);
                assert_ne!(
                    text, *key,
                    "key {key:?} has no {locale} translation"
                );
                assert!(!text.is_empty(), "key {key:?} is empty in {locale}");
            }
        }
    }

    #[test]
    fn parses_codes_and_regional_variants() {
        assert_eq!("es".parse::<Locale>(), Ok(Locale::Es));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("es-MX".parse::<Locale>(), Ok(Locale::Es));
        assert_eq!("en_US".parse::<Locale>(), Ok(Locale::En));
    }

    #[test]
    fn rejects_codes_outside_the_set() {
        assert!("fr".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
        assert!("zz-ES".parse::<Locale>().is_err());
    }

    #[test]
    fn other_is_an_involution() {
        assert_eq!(Locale::Es.other(), Locale::En);
        assert_eq!(Locale::En.other().other(), Locale::En);
    }
}
