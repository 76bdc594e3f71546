use std::path::PathBuf;

use crate::config::Config;
use crate::i18n::{self, DEFAULT_LOCALE, Locale};
use crate::utils::log_msg;

type Subscriber = Box<dyn Fn(Locale)>;

/// Single source of truth for the active display locale.
///
/// Constructed once in `main` and handed to the app by value; everything
/// that needs the locale reads it from here instead of a global. The one
/// rust-i18n global (`set_locale`, feeding bare `t!` calls in the UI) is
/// kept in sync by this store and written nowhere else.
pub struct LocaleStore {
    active: Locale,
    config_path: PathBuf,
    subscribers: Vec<Subscriber>,
}

impl LocaleStore {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            active: DEFAULT_LOCALE,
            config_path,
            subscribers: Vec::new(),
        }
    }

    /// Adopt the persisted locale if it names a member of the valid set,
    /// otherwise keep the default. Call once per session, before the first
    /// read. A missing or unreadable preference file is not an error.
    pub fn initialize(&mut self) -> Locale {
        let config = Config::load(&self.config_path);
        if let Some(code) = config.locale.as_deref() {
            match code.parse::<Locale>() {
                Ok(locale) => self.active = locale,
                Err(e) => log_msg("warn", &format!("Ignoring persisted locale: {e}")),
            }
        }
        i18n::init_locale(self.active);
        self.active
    }

    pub fn get(&self) -> Locale {
        self.active
    }

    /// Catalog lookup bound to the active locale.
    pub fn text(&self, key: &str) -> String {
        i18n::lookup(self.active, key)
    }

    /// Switch the active locale. The in-memory state (and the rust-i18n
    /// global behind `t!`) updates immediately; the write-through to disk is
    /// best-effort and never blocks the switch. Subscribers are notified on
    /// every call.
    pub fn set(&mut self, locale: Locale) {
        self.active = locale;
        i18n::init_locale(locale);

        let config = Config {
            locale: Some(locale.code().to_string()),
        };
        if let Err(e) = config.save(&self.config_path) {
            log_msg("warn", &format!("Failed to persist locale {locale}: {e}"));
        }

        for subscriber in &self.subscribers {
            subscriber(locale);
        }
    }

    /// Flip to the other member of the two-locale set.
    pub fn toggle(&mut self) -> Locale {
        let next = self.active.other();
        self.set(next);
        next
    }

    /// Register for locale-change notifications, fired on every `set`.
    pub fn subscribe(&mut self, subscriber: impl Fn(Locale) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("finsage-tour-store-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn defaults_to_spanish_with_nothing_persisted() {
        let mut store = LocaleStore::new(temp_config("fresh"));
        assert_eq!(store.initialize(), Locale::Es);
        assert_eq!(store.get(), Locale::Es);
    }

    #[test]
    fn adopts_a_valid_persisted_locale() {
        let path = temp_config("persisted-en");
        Config {
            locale: Some("en".to_string()),
        }
        .save(&path)
        .unwrap();

        let mut store = LocaleStore::new(path.clone());
        assert_eq!(store.initialize(), Locale::En);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn ignores_a_persisted_locale_outside_the_set() {
        let path = temp_config("persisted-bad");
        Config {
            locale: Some("fr".to_string()),
        }
        .save(&path)
        .unwrap();

        let mut store = LocaleStore::new(path.clone());
        assert_eq!(store.initialize(), Locale::Es);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn set_is_visible_immediately_and_written_through() {
        let path = temp_config("set");
        let mut store = LocaleStore::new(path.clone());
        store.initialize();

        store.set(Locale::En);
        assert_eq!(store.get(), Locale::En);
        assert_eq!(Config::load(&path).locale.as_deref(), Some("en"));

        store.set(Locale::Es);
        assert_eq!(store.get(), Locale::Es);
        assert_eq!(Config::load(&path).locale.as_deref(), Some("es"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn toggle_twice_returns_to_the_original() {
        let path = temp_config("toggle");
        let mut store = LocaleStore::new(path.clone());
        let original = store.initialize();

        assert_eq!(store.toggle(), original.other());
        assert_eq!(store.toggle(), original);
        assert_eq!(store.get(), original);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn subscribers_hear_every_set() {
        let path = temp_config("subscribers");
        let mut store = LocaleStore::new(path.clone());
        store.initialize();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |locale| sink.borrow_mut().push(locale));

        store.set(Locale::En);
        store.set(Locale::En);
        store.toggle();
        assert_eq!(*seen.borrow(), vec![Locale::En, Locale::En, Locale::Es]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn a_failed_write_does_not_block_the_switch() {
        // Parent directory does not exist, so every save fails.
        let path = std::env::temp_dir()
            .join(format!("finsage-tour-store-{}-missing", std::process::id()))
            .join("nested")
            .join("config.json");
        let mut store = LocaleStore::new(path);
        store.initialize();

        store.set(Locale::En);
        assert_eq!(store.get(), Locale::En);
    }
}
