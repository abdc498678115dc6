//! Concrete proxies (spec §4.4): `MailboxProxy`, `OutboxProxy`,
//! `SimulationRunProxy`. Each holds a `RequestSender<GameSession>` to post
//! work with, and a `Trampoline` caching its game-thread-resident
//! adaptor state. Synchronous methods use `WaitIndicator`; asynchronous
//! ones post and return immediately, delivering their reply over a plain
//! channel the caller polls (`poll_update`) — the UI-thread-hop a real
//! `sig_xxx` signal would need.

use crate::msg::{BrowseMode, Configuration as MsgConfiguration, Inbox, Mailbox, Outbox, OutboxMessageId};
use crate::proxy::adaptor::{Adaptor, Trampoline};
use crate::proxy::sender::RequestSender;
use crate::proxy::stopsignal::StopSignal;
use crate::proxy::wait::WaitIndicator;
use crate::sim::{ResultList, RunLimit, Runner, SerialRunner};
use std::sync::Arc;
use std::sync::mpsc;

/// Stand-in for the source's Game/Root/ShipList aggregate: the session
/// object every proxy in this module ultimately reaches through to.
pub struct GameSession {
    pub inbox: Inbox,
    pub outbox: Outbox,
    pub msg_config: MsgConfiguration,
    pub sim_runner: Option<SerialRunner>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self { inbox: Inbox::new(), outbox: Outbox::new(), msg_config: MsgConfiguration::default(), sim_runner: None }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `MailboxAdaptor`'s current-position storage (spec §4.4): the mailbox
/// data itself stays in the session and is read fresh every call.
#[derive(Default)]
pub struct InboxAdaptorState {
    pub current_message: usize,
}
impl Adaptor for InboxAdaptorState {}

pub struct MailboxProxy {
    session: RequestSender<GameSession>,
    trampoline: Arc<Trampoline<GameSession, InboxAdaptorState>>,
}

impl MailboxProxy {
    pub fn new(session: RequestSender<GameSession>) -> Self {
        Self { session, trampoline: Arc::new(Trampoline::new(|_| InboxAdaptorState::default())) }
    }

    /// Synchronous: message count and the cached current index.
    pub fn status<U>(&self, wait: &mut WaitIndicator<'_, U>) -> (usize, usize) {
        let trampoline = self.trampoline.clone();
        wait.call(&self.session, move |session| {
            trampoline.make_temporary_with(session, |state, session| (session.inbox.num_messages(), state.current_message))
        })
    }

    /// Asynchronous: sets the current message index (always the global
    /// index, per §8.2 S5, even when the caller derived it from a subset
    /// view).
    pub fn set_current_message(&self, index: usize) {
        let trampoline = self.trampoline.clone();
        self.session.post(move |session| {
            trampoline.make_temporary_with(session, |state, _| state.current_message = index);
        });
    }

    /// Synchronous: navigates and returns the new current index, if any.
    pub fn browse<U>(&self, wait: &mut WaitIndicator<'_, U>, mode: BrowseMode, amount: usize, accept_filtered: bool) -> Option<usize> {
        let trampoline = self.trampoline.clone();
        wait.call(&self.session, move |session| {
            trampoline.make_temporary_with(session, |state, session| {
                let browser = crate::msg::Browser::new(&session.inbox, &session.msg_config);
                let next = browser.browse(Some(state.current_message), mode, amount, accept_filtered);
                if let Some(i) = next {
                    state.current_message = i;
                }
                next
            })
        })
    }
}

pub struct OutboxProxy {
    session: RequestSender<GameSession>,
}

impl OutboxProxy {
    pub fn new(session: RequestSender<GameSession>) -> Self {
        Self { session }
    }

    pub fn count<U>(&self, wait: &mut WaitIndicator<'_, U>) -> usize {
        wait.call(&self.session, |session| session.outbox.num_messages())
    }

    /// Asynchronous: addressed by the stable id the outbox hands back,
    /// not by index (spec §4.5: safe under background modification).
    pub fn add_message(&self, body: String, receivers: [bool; 12], turn_number: u32) {
        self.session.post(move |session| {
            session.outbox.add(body, receivers, turn_number);
        });
    }

    pub fn delete_message(&self, id: OutboxMessageId) {
        self.session.post(move |session| session.outbox.remove(id));
    }
}

/// A sim batch's throttled progress notification (spec §4.2.3 `sig_update`)
/// plus the terminal `sig_stop`, delivered over a plain channel instead of
/// a cross-thread signal — the UI polls `SimulationRunProxy::poll_update`.
#[derive(Debug, Clone)]
pub enum SimulationUpdate {
    Progress { num_battles: u32 },
    Stopped { results: ResultList },
}

pub struct SimulationRunProxy {
    session: RequestSender<GameSession>,
    update_rx: mpsc::Receiver<SimulationUpdate>,
    update_tx: mpsc::Sender<SimulationUpdate>,
    /// The currently live run's stop signal, if a batch is running. A
    /// fresh one is allocated per `run_*` call (spec §4.4 "Cancellation").
    current_stop: Option<StopSignal>,
}

impl SimulationRunProxy {
    pub fn new(session: RequestSender<GameSession>) -> Self {
        let (update_tx, update_rx) = mpsc::channel();
        Self { session, update_rx, update_tx, current_stop: None }
    }

    /// Non-blocking poll for the next queued update, if any.
    pub fn poll_update(&self) -> Option<SimulationUpdate> {
        self.update_rx.try_recv().ok()
    }

    /// Stops any run this proxy currently has in flight. Dropping our own
    /// reference to the old `StopSignal` afterwards (by overwriting
    /// `current_stop` in the next `run_*` call) guarantees the next run's
    /// signal can never be the one we just set.
    pub fn stop(&mut self) {
        if let Some(stop) = self.current_stop.take() {
            stop.set();
        }
    }

    /// Asynchronous: runs until `limit`, posting `Progress` updates at the
    /// runner's configured throttle and a final `Stopped` when done.
    pub fn run(&mut self, limit: RunLimit) {
        self.stop();
        let stop = StopSignal::new();
        self.current_stop = Some(stop.clone());
        let update_tx = self.update_tx.clone();
        self.session.post(move |session| {
            let Some(runner) = session.sim_runner.as_mut() else { return };
            let update_tx_for_signal = update_tx.clone();
            let token = runner.on_update().connect(move |_| {
                let _ = update_tx_for_signal.send(SimulationUpdate::Progress { num_battles: 0 });
            });
            runner.run(limit, &stop.as_stopper());
            runner.on_update().disconnect(token);
            let _ = update_tx.send(SimulationUpdate::Stopped { results: runner.results() });
        });
    }

    pub fn run_finite(&mut self, n: u32) {
        self.run(RunLimit::Finite(n));
    }

    pub fn run_infinite(&mut self) {
        self.run(RunLimit::NoLimit);
    }

    pub fn run_series(&mut self) {
        self.run(RunLimit::SeriesLimit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::sender::channel;
    use crate::proxy::session_thread::SessionThread;

    fn spawn_session() -> SessionThread<GameSession> {
        SessionThread::spawn(GameSession::new)
    }

    #[test]
    fn mailbox_proxy_status_reflects_seeded_messages() {
        let thread = spawn_session();
        let sender = thread.sender();
        sender.post(|session| {
            session.inbox.add("hello", "General", 1);
            session.inbox.add("world", "General", 1);
        });

        let proxy = MailboxProxy::new(sender);
        let (ui_tx, ui_rx) = channel::<()>();
        let mut ui_owner = ();
        let mut wait = WaitIndicator::new(&mut ui_owner, &ui_rx);
        let (count, current) = proxy.status(&mut wait);
        assert_eq!(count, 2);
        assert_eq!(current, 0);
        drop(ui_tx);
        thread.shutdown();
    }

    #[test]
    fn mailbox_proxy_set_current_message_persists_across_calls() {
        let thread = spawn_session();
        let sender = thread.sender();
        sender.post(|session| {
            for i in 0..3 {
                session.inbox.add(format!("m{i}"), "General", 1);
            }
        });
        let proxy = MailboxProxy::new(sender);
        proxy.set_current_message(2);

        let (_ui_tx, ui_rx) = channel::<()>();
        let mut ui_owner = ();
        let mut wait = WaitIndicator::new(&mut ui_owner, &ui_rx);
        // give the posted set-message a chance to land before the
        // synchronous status call (call() itself serializes on the
        // session thread's FIFO queue, so this is deterministic: the post
        // above is already queued ahead of the status request below).
        let (_count, current) = proxy.status(&mut wait);
        assert_eq!(current, 2);
        thread.shutdown();
    }

    #[test]
    fn simulation_run_proxy_delivers_a_stopped_update_with_results() {
        use crate::fcode::FriendlyCodeList;
        use crate::map::ship::Aggressiveness;
        use crate::sim::{Configuration, Mode, Options, SharedSetup, SimShip, Setup};
        use std::time::{Duration, Instant};

        fn outrider(id: usize, owner: u8) -> SimShip {
            SimShip {
                id,
                name: format!("outrider-{id}"),
                friendly_code: "???".to_string(),
                owner,
                hull_type: 2,
                engine_type: 9,
                beam_type: 3,
                beam_count: 2,
                torpedo_type: 0,
                launcher_count: 0,
                ammo: 0,
                bay_count: 0,
                fighter_count: 0,
                damage: 0,
                shields: 60,
                crew: 40,
                mass: 65,
                aggressiveness: Aggressiveness::Kill,
                intercept_id: None,
                is_flak_enabled: false,
                is_commander: false,
                experience_level: 0,
                randomize_fcode_every_fight: false,
                randomize_fcode_once_per_batch: false,
            }
        }

        let thread = spawn_session();
        let sender = thread.sender();
        sender.post(|session| {
            let shared = SharedSetup {
                base: Setup { ships: vec![outrider(1, 1), outrider(2, 2)], planet: None },
                opts: Options::default(),
                fcodes: FriendlyCodeList::new(),
                config: Configuration { mode: Mode::VcrHost, ..Configuration::default() },
                parent_seed: 5,
                series_length: 10,
            };
            let mut runner = SerialRunner::new(shared);
            runner.init().unwrap();
            session.sim_runner = Some(runner);
        });

        let mut proxy = SimulationRunProxy::new(sender);
        proxy.run_finite(20);

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut final_results = None;
        while Instant::now() < deadline {
            match proxy.poll_update() {
                Some(SimulationUpdate::Stopped { results }) => {
                    final_results = Some(results);
                    break;
                }
                _ => std::thread::sleep(Duration::from_millis(5)),
            }
        }
        let results = final_results.expect("simulation proxy should deliver a Stopped update");
        assert!(results.num_battles() >= 20);
        thread.shutdown();
    }

    #[test]
    fn outbox_proxy_add_then_delete_round_trips() {
        let thread = spawn_session();
        let sender = thread.sender();
        let proxy = OutboxProxy::new(sender);
        proxy.add_message("draft".to_string(), [false; 12], 1);

        let (_ui_tx, ui_rx) = channel::<()>();
        let mut ui_owner = ();
        let mut wait = WaitIndicator::new(&mut ui_owner, &ui_rx);
        assert_eq!(proxy.count(&mut wait), 1);
        proxy.delete_message(0);
        assert_eq!(proxy.count(&mut wait), 0);
        thread.shutdown();
    }
}
