//! Per-client handle on one game.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use log::debug;

use crate::cards::{self, CardCatalog, CardInstance, ImportedDeck};
use crate::core::action::Action;
use crate::core::clock::Clock;
use crate::core::config::TableConfig;
use crate::core::entity::{GameCode, InstanceId};
use crate::core::error::{DispatchError, Notice, StoreError};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::rules::{reduce, Outcome, ReduceContext};
use crate::targeting::{TargetMode, TargetRef, TargetingSession};

use super::GameStore;

/// One player's view of one game.
///
/// Holds what never goes into the shared document: the last rejection
/// notice, the privately peeked library card and the open targeting
/// session.
pub struct Table<S: GameStore + ?Sized, C: Clock> {
    store: Arc<S>,
    code: GameCode,
    player: PlayerId,
    config: TableConfig,
    rng: GameRng,
    clock: C,
    notice: Option<Notice>,
    peek: Option<CardInstance>,
    targeting: Option<TargetingSession>,
}

impl<S: GameStore + ?Sized, C: Clock> Table<S, C> {
    pub fn new(
        store: Arc<S>,
        code: GameCode,
        player: PlayerId,
        config: TableConfig,
        rng: GameRng,
        clock: C,
    ) -> Self {
        Self {
            store,
            code,
            player,
            config,
            rng,
            clock,
            notice: None,
            peek: None,
            targeting: None,
        }
    }

    pub fn code(&self) -> &GameCode {
        &self.code
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Current document.
    pub fn state(&self) -> Result<GameState, StoreError> {
        Ok(self.store.load(&self.code)?.state)
    }

    pub fn subscribe(&self) -> Result<Receiver<Arc<GameState>>, StoreError> {
        self.store.subscribe(&self.code)
    }

    /// Read, reduce and write one action.
    ///
    /// A rejection writes nothing and leaves a notice for the player.
    /// Empty outcomes are not written.
    pub fn dispatch(&mut self, action: &Action) -> Result<Outcome, DispatchError> {
        let state = self.store.load(&self.code)?.state;
        let now = self.clock.now();
        let mut ctx = ReduceContext::new(&mut self.rng, now, &self.config);

        let outcome = match reduce(&state, &self.player, action, &mut ctx) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                self.notice = Some(rejection.notice(now, self.config.notice_ttl_ms));
                return Err(rejection.into());
            }
        };

        if !outcome.update.is_empty() {
            let version = self.store.apply(&self.code, &outcome.update)?;
            debug!("{}: {} wrote v{}", self.code, self.player, version);
        }

        match action {
            Action::ScryTop { .. } => self.peek = outcome.peek.clone(),
            Action::ScryBottom { .. } | Action::ScryKeepTop => self.peek = None,
            _ => {}
        }
        Ok(outcome)
    }

    /// The current notice, if it has not expired.
    pub fn notice(&self) -> Option<&Notice> {
        let now = self.clock.now();
        self.notice.as_ref().filter(|n| n.is_visible(now))
    }

    /// Card seen by the last scry, until it is kept or bottomed.
    pub fn peek(&self) -> Option<&CardInstance> {
        self.peek.as_ref()
    }

    /// Resolve a decklist through `catalog` and add it to this player's
    /// library.
    pub fn import_deck(
        &mut self,
        catalog: &dyn CardCatalog,
        decklist: &str,
    ) -> Result<ImportedDeck, DispatchError> {
        let deck = cards::import_deck(catalog, decklist, &self.player, &mut self.rng);
        self.dispatch(&Action::ImportDeck {
            cards: deck.cards.clone(),
            line_count: deck.line_count,
        })?;
        Ok(deck)
    }

    // === Targeting ===

    /// Start choosing targets for `source`. Replaces any open session.
    pub fn begin_targeting(&mut self, source: InstanceId, mode: TargetMode) {
        self.targeting = Some(TargetingSession::new(source, mode));
    }

    pub fn targeting(&self) -> Option<&TargetingSession> {
        self.targeting.as_ref()
    }

    /// Toggle a candidate. Returns whether it is now selected, or `None`
    /// when no session is open.
    pub fn toggle_target(&mut self, target: TargetRef) -> Option<bool> {
        self.targeting.as_mut().map(|s| s.toggle(target))
    }

    /// Dispatch the open session's action, if it has one.
    pub fn finish_targeting(&mut self) -> Result<Option<Outcome>, DispatchError> {
        match self.targeting.take().and_then(TargetingSession::finish) {
            Some(action) => self.dispatch(&action).map(Some),
            None => Ok(None),
        }
    }

    pub fn cancel_targeting(&mut self) {
        if let Some(session) = self.targeting.take() {
            session.cancel();
        }
    }
}
