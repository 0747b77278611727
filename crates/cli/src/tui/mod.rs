//! Full-screen offer picker
//!
//! Draws the ranked offers and reads one key at a time until the operator
//! presses Enter or quits. The yes/no confirmation runs with the terminal
//! restored, then the picker re-enters full screen if the answer was no.
//! Quitting the confirmation cancels the whole selection.

pub mod events;

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use scout_lib::format::{format_divider, format_header, format_row, offer_rows, table_width, truncate};
use scout_lib::{Key, PricedOffer, SearchProfile, SelectionState, Selector};

use crate::output::legend_lines;
use events::key_from_event;

/// Set while a `TerminalSession` holds raw mode
static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// One line of the picker screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub text: String,
    pub highlighted: bool,
}

impl ScreenLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }
}

/// Raw mode and alternate screen, restored on drop
pub struct TerminalSession {
    out: Stdout,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        SESSION_ACTIVE.store(true, Ordering::SeqCst);
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide) {
            restore_terminal();
            return Err(e.into());
        }
        Ok(Self { out })
    }

    /// Clear and redraw every line
    pub fn draw(&mut self, lines: &[ScreenLine]) -> Result<()> {
        let (width, height) = terminal::size()?;
        let max_chars = usize::from(width).saturating_sub(1);

        queue!(self.out, Clear(ClearType::All))?;
        for (y, line) in lines.iter().take(usize::from(height)).enumerate() {
            queue!(self.out, MoveTo(0, y as u16))?;
            if line.highlighted {
                queue!(self.out, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                self.out,
                Print(truncate(&line.text, max_chars)),
                SetAttribute(Attribute::Reset)
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Block until a key the picker understands, or a resize
    pub fn read_key(&mut self) -> Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(key) = key_from_event(&key) {
                        return Ok(key);
                    }
                }
                Event::Resize(..) => return Ok(Key::Other),
                _ => {}
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Leave the alternate screen and raw mode if a session entered them
///
/// Returns whether anything was restored. Nothing is written otherwise, so
/// piped output never picks up escape codes.
pub fn restore_terminal() -> bool {
    if !SESSION_ACTIVE.swap(false, Ordering::SeqCst) {
        return false;
    }
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    true
}

/// Restore the terminal before a panic message is printed
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

/// Lay out the picker screen for the current selection
pub fn screen_lines(offers: &[PricedOffer], selector: &Selector, profile: &SearchProfile) -> Vec<ScreenLine> {
    let width = table_width();
    let cursor = selector.cursor();

    let mut lines = vec![
        ScreenLine::plain(format!(
            "TOP {} OFFERS by estimated hourly cost ({} profile) - selected #{}",
            offers.len(),
            profile.name,
            cursor + 1
        )),
        ScreenLine::plain("=".repeat(width)),
        ScreenLine::plain(format_header()),
        ScreenLine::plain(format_divider()),
    ];

    lines.extend(
        offer_rows(offers)
            .iter()
            .enumerate()
            .map(|(idx, row)| ScreenLine {
                text: format_row(row),
                highlighted: idx == cursor,
            }),
    );

    lines.push(ScreenLine::plain("=".repeat(width)));
    lines.push(ScreenLine::plain(""));
    lines.extend(legend_lines(profile).into_iter().map(ScreenLine::plain));
    lines.push(ScreenLine::plain(""));
    lines.push(ScreenLine::plain("UP/DOWN to move, ENTER to rent, Q to quit"));
    lines
}

/// Where browsing keys come from
pub trait Browser {
    /// Feed keys to `selector` until it leaves `Browsing`
    fn browse(&mut self, offers: &[PricedOffer], selector: &mut Selector, profile: &SearchProfile) -> Result<()>;
}

/// The real terminal, entered for one browsing stretch at a time
pub struct FullScreen;

impl Browser for FullScreen {
    fn browse(&mut self, offers: &[PricedOffer], selector: &mut Selector, profile: &SearchProfile) -> Result<()> {
        let mut session = TerminalSession::enter()?;
        while matches!(selector.state(), SelectionState::Browsing { .. }) {
            session.draw(&screen_lines(offers, selector, profile))?;
            let key = session.read_key()?;
            selector.handle_key(key);
        }
        Ok(())
    }
}

/// Run the full-screen picker until the selection is cancelled or committed
///
/// `confirm` is asked about the chosen offer with the terminal restored. It
/// answers `Some(yes)`, or `None` when the operator quit the prompt.
pub fn run_picker<F>(offers: &[PricedOffer], profile: &SearchProfile, confirm: F) -> Result<Selector>
where
    F: FnMut(&PricedOffer) -> Result<Option<bool>>,
{
    pick_with(&mut FullScreen, offers, profile, confirm)
}

/// Picker loop over any key source
pub fn pick_with<B, F>(browser: &mut B, offers: &[PricedOffer], profile: &SearchProfile, mut confirm: F) -> Result<Selector>
where
    B: Browser,
    F: FnMut(&PricedOffer) -> Result<Option<bool>>,
{
    let mut selector = Selector::new(offers.len());
    if selector.is_empty() {
        return Ok(selector);
    }

    loop {
        browser.browse(offers, &mut selector, profile)?;

        let index = match selector.state() {
            SelectionState::Confirming { index } => *index,
            _ => return Ok(selector),
        };

        match confirm(&offers[index])? {
            Some(accepted) => {
                selector.confirm(accepted, offers, profile.bid_increment);
            }
            None => {
                selector.handle_key(Key::Quit);
            }
        }
        if selector.state().is_terminal() {
            return Ok(selector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_lib::{InstanceCategory, Offer, RawOffer};
    use std::collections::VecDeque;

    /// Replays a fixed key sequence, then quits
    struct ScriptedKeys(VecDeque<Key>);

    impl ScriptedKeys {
        fn new(keys: &[Key]) -> Self {
            Self(keys.iter().copied().collect())
        }
    }

    impl Browser for ScriptedKeys {
        fn browse(&mut self, _offers: &[PricedOffer], selector: &mut Selector, _profile: &SearchProfile) -> Result<()> {
            while matches!(selector.state(), SelectionState::Browsing { .. }) {
                selector.handle_key(self.0.pop_front().unwrap_or(Key::Quit));
            }
            Ok(())
        }
    }

    fn offers(n: usize) -> Vec<PricedOffer> {
        (0..n)
            .map(|i| PricedOffer {
                offer: Offer::from_raw(
                    RawOffer {
                        id: Some(format!("{}", 1000 + i)),
                        gpu_name: Some("RTX_4090".to_string()),
                        ..RawOffer::default()
                    },
                    InstanceCategory::OnDemand,
                ),
                estimated_total_cost: 0.1 * (i as f64 + 1.0),
            })
            .collect()
    }

    #[test]
    fn test_one_line_per_offer_with_cursor_highlighted() {
        let offers = offers(3);
        let mut selector = Selector::new(offers.len());
        selector.handle_key(Key::Down);

        let lines = screen_lines(&offers, &selector, &SearchProfile::general());
        let rows: Vec<_> = lines.iter().filter(|l| l.text.contains("RTX 4090")).collect();
        assert_eq!(rows.len(), 3);

        let highlighted: Vec<_> = lines.iter().filter(|l| l.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert!(highlighted[0].text.contains("1001"));
        assert!(lines[0].text.contains("selected #2"));
    }

    #[test]
    fn test_footer_lists_keys() {
        let offers = offers(1);
        let selector = Selector::new(offers.len());
        let lines = screen_lines(&offers, &selector, &SearchProfile::general());
        assert!(lines
            .last()
            .map(|l| l.text.contains("Q to quit"))
            .unwrap_or(false));
    }

    #[test]
    fn test_rows_fit_table_width() {
        let offers = offers(2);
        let selector = Selector::new(offers.len());
        let lines = screen_lines(&offers, &selector, &SearchProfile::general());
        assert!(lines
            .iter()
            .skip(1)
            .take(5)
            .all(|l| l.text.chars().count() <= table_width()));
    }

    #[test]
    fn test_empty_list_skips_terminal() {
        let mut asked = false;
        let selector = run_picker(&[], &SearchProfile::general(), |_| {
            asked = true;
            Ok(Some(true))
        })
        .unwrap();
        assert!(!asked);
        assert!(selector.rent_request(&[], &SearchProfile::general()).is_none());
    }

    #[test]
    fn test_quitting_confirmation_cancels() {
        let offers = offers(2);
        let profile = SearchProfile::general();
        let mut asked = 0;

        let selector = pick_with(&mut ScriptedKeys::new(&[Key::Enter]), &offers, &profile, |_| {
            asked += 1;
            Ok(None)
        })
        .unwrap();

        assert_eq!(asked, 1);
        assert_eq!(*selector.state(), SelectionState::Cancelled);
        assert!(selector.rent_request(&offers, &profile).is_none());
    }

    #[test]
    fn test_declined_confirmation_returns_to_browsing() {
        let offers = offers(3);
        let profile = SearchProfile::general();
        let mut answers = VecDeque::from([Some(false), Some(true)]);
        let mut asked = Vec::new();

        let keys = [Key::Enter, Key::Down, Key::Enter];
        let selector = pick_with(&mut ScriptedKeys::new(&keys), &offers, &profile, |priced| {
            asked.push(priced.offer.id.clone());
            Ok(answers.pop_front().flatten())
        })
        .unwrap();

        assert_eq!(asked, [Some("1000".to_string()), Some("1001".to_string())]);
        let request = selector.rent_request(&offers, &profile).unwrap().unwrap();
        assert_eq!(request.offer_id, "1001");
    }

    #[test]
    fn test_restore_without_session_writes_nothing() {
        assert!(!restore_terminal());
    }
}
