use crate::chart::{self, CanvasTarget, ChartError, ChartInstance, EARNINGS};
use crate::i18n::Locale;
use crate::store::LocaleStore;
use crate::types::{AppEvent, Section};
use crate::utils::log_msg;
use crossterm::event::{KeyCode, KeyModifiers};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

pub struct App {
    pub store: LocaleStore,
    pub section: Section,
    pub scroll_y: u16,

    pub chart_target: Rc<CanvasTarget>,
    pub chart: Option<ChartInstance>,

    rx: Receiver<AppEvent>,
}

impl App {
    pub fn new(mut store: LocaleStore) -> Self {
        let (tx, rx) = mpsc::channel();
        store.subscribe(move |locale| {
            let _ = tx.send(AppEvent::LocaleChanged(locale));
        });

        Self {
            store,
            section: Section::Hero,
            scroll_y: 0,
            chart_target: Rc::new(CanvasTarget::new()),
            chart: None,
            rx,
        }
    }

    /// Drain pending notifications. Runs at the top of every tick, so a
    /// locale switch is reflected before the next draw.
    pub fn handle_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                AppEvent::LocaleChanged(locale) => {
                    log_msg("info", &format!("Locale changed to {locale}"));
                    self.remount_chart(locale);
                }
            }
        }
    }

    /// Chart labels are locale-bound, so a locale switch rebuilds the whole
    /// configuration and swaps the live instance.
    fn remount_chart(&mut self, locale: Locale) {
        if self.chart.is_none() {
            return; // nothing mounted; sync_chart builds the next one fresh
        }
        let config = chart::build_config(&EARNINGS, locale);
        match chart::remount(self.chart.take(), &self.chart_target, config) {
            Ok(instance) => self.chart = Some(instance),
            Err(ChartError::TargetUnavailable) => {
                // Target went away mid-switch; sync_chart retries next tick.
                log_msg("warn", "Chart remount deferred: target unavailable");
            }
        }
    }

    /// Reconcile the chart instance with what is on screen. Runs once per
    /// tick, after drawing: the hero section owns the only chart target, and
    /// a mount that fails because the layout has not attached the target yet
    /// is simply retried on the next cycle. A chart whose surface went away
    /// (section change, terminal too small) is disposed.
    pub fn sync_chart(&mut self) {
        let visible = self.section == Section::Hero && self.chart_target.is_attached();
        if visible {
            if self.chart.is_none() {
                let config = chart::build_config(&EARNINGS, self.store.get());
                match chart::mount(&self.chart_target, config) {
                    Ok(instance) => self.chart = Some(instance),
                    Err(ChartError::TargetUnavailable) => {}
                }
            }
        } else if let Some(instance) = self.chart.take() {
            chart::dispose(instance);
        }
    }

    pub fn on_key(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('l') => {
                self.store.toggle();
            }

            KeyCode::Tab => self.goto_section(self.section.next()),
            KeyCode::BackTab => self.goto_section(self.section.prev()),
            KeyCode::Char('1') => self.goto_section(Section::Hero),
            KeyCode::Char('2') => self.goto_section(Section::UseCases),
            KeyCode::Char('3') => self.goto_section(Section::Tools),
            KeyCode::Char('4') => self.goto_section(Section::Install),

            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_y = self.scroll_y.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_y = self.scroll_y.saturating_sub(1);
            }
            KeyCode::PageDown => self.scroll_y = self.scroll_y.saturating_add(10),
            KeyCode::PageUp => self.scroll_y = self.scroll_y.saturating_sub(10),
            _ => {}
        }
        false
    }

    fn goto_section(&mut self, section: Section) {
        if section != self.section {
            self.section = section;
            self.scroll_y = 0;
        }
    }

    /// Release the chart on the way out, whatever the exit path.
    pub fn shutdown(&mut self) {
        if let Some(instance) = self.chart.take() {
            chart::dispose(instance);
        }
    }
}
