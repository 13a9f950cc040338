//! Property-based tests for the connection lifecycle.
//!
//! Arbitrary navigation, network faults and inbound traffic are fed through
//! the production runtime. The standard invariants are checked after every
//! step, and each property adds its own oracle on top.

use std::time::Duration;

use parley_app::{AppEvent, DirectoryRequest, Runtime, SessionConfig, UiUpdate};
use parley_core::{LinkState, TransportEvent};
use parley_harness::{InvariantRegistry, SessionSnapshot, SimDirectory, SimDriver, SimEnv};
use parley_proto::{Context, Endpoint};
use proptest::prelude::*;

type SimRuntime = Runtime<SimDriver, SimEnv>;

const DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
enum Op {
    Room(String),
    Dm(String),
    Clear,
    /// Network drops the live connection.
    Drop,
    /// Transport confirms closes the session asked for, late.
    EchoClosed,
    Advance(u64),
    Garbage(String),
    Typing { sender: String, is_typing: bool },
    Input(usize),
    Submit(String),
}

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["general", "random", "alice", "bob"]).prop_map(str::to_string)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => name().prop_map(Op::Room),
        3 => name().prop_map(Op::Dm),
        1 => Just(Op::Clear),
        2 => Just(Op::Drop),
        1 => Just(Op::EchoClosed),
        2 => (0u64..3000).prop_map(Op::Advance),
        1 => "[ -~]{0,16}".prop_map(Op::Garbage),
        2 => (prop_oneof![Just("me".to_string()), name()], any::<bool>())
            .prop_map(|(sender, is_typing)| Op::Typing { sender, is_typing }),
        1 => (0usize..10).prop_map(Op::Input),
        1 => "[a-z ]{0,10}".prop_map(Op::Submit),
    ]
}

fn directory() -> SimDirectory {
    SimDirectory::new("me")
        .with_room("general", true)
        .with_room("random", false)
        .with_user("alice")
        .with_user("bob")
}

fn runtime() -> SimRuntime {
    let env = SimEnv::new();
    let driver = SimDriver::new(env.clone()).with_directory(directory());
    let endpoint = Endpoint::from_server_url("http://chat.test").unwrap();
    let mut runtime = Runtime::with_config(driver, env, endpoint, SessionConfig::new("me"));
    runtime.start().unwrap();
    runtime
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
}

/// Step until idle, checking invariants after every step.
async fn settle(runtime: &mut SimRuntime, registry: &InvariantRegistry) -> Result<(), String> {
    while runtime.driver().has_pending() {
        if runtime.step().await.map_err(|e| e.to_string())? {
            return Err("session quit while settling".into());
        }
        let snapshot = SessionSnapshot::capture(runtime.app(), runtime.driver());
        registry.check_all(&snapshot).map_err(|violations| format!("{violations:?}"))?;
    }
    Ok(())
}

fn apply(runtime: &mut SimRuntime, op: Op) {
    let live = runtime.driver().recording().live.last().copied();
    let driver = runtime.driver_mut();
    match op {
        Op::Room(name) => driver.script_event(AppEvent::SelectRoom(name)),
        Op::Dm(peer) => driver.script_event(AppEvent::SelectDirectMessage(peer)),
        Op::Clear => driver.script_event(AppEvent::ClearSelection),
        Op::Drop => {
            if let Some(id) = live {
                driver.drop_connection(id);
            }
        },
        Op::EchoClosed => {
            for id in driver.recording().closed.clone() {
                driver.inject_event(AppEvent::Transport(TransportEvent::Closed { id }));
            }
        },
        Op::Advance(ms) => driver.script_advance(Duration::from_millis(ms)),
        Op::Garbage(text) => {
            if let Some(id) = live {
                driver.deliver(id, text);
            }
        },
        Op::Typing { sender, is_typing } => {
            if let Some(id) = live {
                let frame = format!(
                    r#"{{"type":"typing_event","username":"{sender}","typing":{is_typing}}}"#
                );
                driver.deliver(id, frame);
            }
        },
        Op::Input(len) => driver.script_event(AppEvent::InputChanged(len)),
        Op::Submit(text) => driver.script_event(AppEvent::Submit(text)),
    }
}

proptest! {
    /// Lifecycle invariants hold under arbitrary interleavings.
    ///
    /// Covers: at most one live connection, the live connection is always
    /// the owned one and scoped to the current context, and the local user
    /// never shows up as typing.
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 1..60)) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            settle(&mut runtime, &registry).await?;
            for op in ops {
                apply(&mut runtime, op.clone());
                settle(&mut runtime, &registry).await.map_err(|e| format!("after {op:?}: {e}"))?;
            }
            Ok::<_, String>(())
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());
        prop_assert_eq!(runtime.driver().recording().stray_sends, 0);
    }

    /// After a selection settles, the connection is scoped to it.
    #[test]
    fn prop_selection_scopes_connection(
        ops in prop::collection::vec(op(), 0..30),
        last in name(),
        room in any::<bool>(),
    ) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let expected = if room {
            Context::room(last.clone()).unwrap()
        } else {
            Context::direct_message(last.clone()).unwrap()
        };
        let result = block_on(async {
            for op in ops {
                apply(&mut runtime, op);
                settle(&mut runtime, &registry).await?;
            }
            let event =
                if room { AppEvent::SelectRoom(last) } else { AppEvent::SelectDirectMessage(last) };
            runtime.driver_mut().script_event(event);
            settle(&mut runtime, &registry).await
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());

        let link = runtime.app().connection().link().cloned();
        prop_assert_eq!(link.map(|link| link.scope), Some(expected.clone()));
        let opened_expected_url = runtime.driver().recording().opened.last().is_some_and(|(_, url)| {
            url.ends_with(&format!("/{}/", expected.target().unwrap_or_default()))
        });
        prop_assert!(opened_expected_url);
    }

    /// Closing connections by navigating never schedules a reconnect, even
    /// when the transport reports the closes late.
    #[test]
    fn prop_intentional_close_never_retries(
        targets in prop::collection::vec((name(), any::<bool>()), 1..10),
        wait in 0u64..10_000,
    ) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            for (target, room) in targets {
                let event = if room {
                    AppEvent::SelectRoom(target)
                } else {
                    AppEvent::SelectDirectMessage(target)
                };
                runtime.driver_mut().script_event(event);
                settle(&mut runtime, &registry).await?;
            }
            apply(&mut runtime, Op::EchoClosed);
            runtime.driver_mut().script_advance(Duration::from_millis(wait));
            settle(&mut runtime, &registry).await
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());

        let recording = runtime.driver().recording();
        let is_connected = matches!(runtime.app().connection().state(), LinkState::Connected { .. });
        prop_assert!(is_connected);
        prop_assert_eq!(recording.opened.len(), recording.closed.len() + 1);
    }

    /// Repeated loss reports for one connection schedule exactly one retry.
    #[test]
    fn prop_duplicate_close_single_retry(drops in 2usize..6, late in 0u64..5000) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            runtime.driver_mut().script_event(AppEvent::SelectRoom("general".into()));
            settle(&mut runtime, &registry).await?;
            let id = runtime.driver().last_opened().ok_or("nothing opened")?;
            for _ in 0..drops {
                runtime.driver_mut().drop_connection(id);
            }
            settle(&mut runtime, &registry).await?;
            runtime.driver_mut().script_advance(DELAY + Duration::from_millis(late));
            settle(&mut runtime, &registry).await
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());

        let recording = runtime.driver().recording();
        prop_assert_eq!(recording.opened.len(), 2);
        prop_assert_eq!(recording.live.len(), 1);
        let is_connected = matches!(runtime.app().connection().state(), LinkState::Connected { .. });
        prop_assert!(is_connected);
    }

    /// Frames without a sender render nothing and leave the link as it was.
    #[test]
    fn prop_senderless_frames_are_silent(
        kind in prop::sample::select(vec!["chat_message", "typing_event", "presence_event"]),
        body in "[a-z ]{0,12}",
    ) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            runtime.driver_mut().script_event(AppEvent::SelectRoom("general".into()));
            settle(&mut runtime, &registry).await?;
            let id = runtime.driver().last_opened().ok_or("nothing opened")?;
            let before = runtime.driver().recording().updates.len();

            let frame = format!(
                r#"{{"type":"{kind}","message":"{body}","typing":true,"status":"online"}}"#
            );
            runtime.driver_mut().deliver(id, frame);
            settle(&mut runtime, &registry).await?;
            Ok::<_, String>((before, runtime.driver().recording().updates.len()))
        });
        let (before, after) = result.map_err(TestCaseError::fail)?;
        prop_assert_eq!(before, after);
        prop_assert!(runtime.app().connection().is_open());
    }

    /// Typing signals carrying the local username never reach the indicator.
    #[test]
    fn prop_own_typing_never_shown(signals in prop::collection::vec(any::<bool>(), 1..20)) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            runtime.driver_mut().script_event(AppEvent::SelectDirectMessage("alice".into()));
            settle(&mut runtime, &registry).await?;
            let id = runtime.driver().last_opened().ok_or("nothing opened")?;
            for is_typing in signals {
                runtime.driver_mut().deliver(
                    id,
                    format!(r#"{{"type":"typing_event","username":"me","typing":{is_typing}}}"#),
                );
            }
            settle(&mut runtime, &registry).await
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());

        let shown = runtime.driver().recording().updates.iter().any(|update| {
            matches!(update, UiUpdate::SetTypingIndicator(Some(_)))
        });
        prop_assert!(!shown);
    }

    /// Joining a room the user already belongs to neither asks the service
    /// nor fails.
    #[test]
    fn prop_join_is_idempotent(joins in 1usize..5) {
        let registry = InvariantRegistry::standard();
        let mut runtime = runtime();
        let result = block_on(async {
            settle(&mut runtime, &registry).await?;
            for _ in 0..joins {
                runtime.driver_mut().script_event(AppEvent::JoinRoom("general".into()));
                settle(&mut runtime, &registry).await?;
            }
            Ok::<_, String>(())
        });
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());

        let recording = runtime.driver().recording();
        let joins =
            recording.requests.iter().filter(|r| matches!(r, DirectoryRequest::Join { .. }));
        prop_assert_eq!(joins.count(), 0);
        prop_assert!(runtime.app().is_member("general"));
        prop_assert_eq!(runtime.app().membership(), Some(true));
        prop_assert_eq!(runtime.app().context(), &Context::room("general").unwrap());
        prop_assert_eq!(runtime.driver().view().status.clone(), None);
        prop_assert!(runtime.driver().view().input_enabled);
    }
}
