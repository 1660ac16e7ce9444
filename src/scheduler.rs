use crate::engine::{Engine, GameEvents, Snapshot};
use crate::error::GameResult;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's animation-frame facility.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameHandle;

    /// Unknown or already cancelled handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Runs the engine at `tick_interval_ms` while rendering every frame.
pub struct Scheduler {
    last_move_time: f64,
    pending: Option<FrameHandle>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { last_move_time: 0.0, pending: None }
    }

    pub fn start(&mut self, host: &mut dyn FrameHost) {
        if self.pending.is_none() {
            self.pending = Some(host.request_frame());
        }
    }

    #[cfg(test)]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// One frame at timestamp `t` (ms): maybe tick, always render, then
    /// schedule the next frame unless the game is over. `render` also gets
    /// the event sink so it can draw whatever the host derived from events.
    ///
    /// A render error is returned as-is and leaves no frame scheduled.
    pub fn on_frame<E, R>(
        &mut self,
        t: f64,
        engine: &mut Engine,
        events: &mut E,
        host: &mut dyn FrameHost,
        mut render: R,
    ) -> GameResult<()>
    where
        E: GameEvents,
        R: FnMut(&Snapshot<'_>, &E) -> GameResult<()>,
    {
        // The delivered frame is consumed either way.
        self.pending = None;

        if engine.is_advancing() && t - self.last_move_time > engine.run_state().tick_interval_ms {
            engine.tick(events);
            self.last_move_time = t;
        }

        render(&engine.snapshot(), &*events)?;

        if !engine.run_state().game_over {
            self.pending = Some(host.request_frame());
        }
        Ok(())
    }

    /// Cancels the pending frame, if any. Safe to call repeatedly.
    pub fn stop(&mut self, host: &mut dyn FrameHost) {
        if let Some(handle) = self.pending.take() {
            host.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::RecordingEvents;
    use crate::engine::INITIAL_TICK_INTERVAL_MS;
    use crate::snake::Direction;

    #[derive(Default)]
    struct MockHost {
        next_id: u64,
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    impl FrameHost for MockHost {
        fn request_frame(&mut self) -> FrameHandle {
            self.next_id += 1;
            let handle = FrameHandle(self.next_id);
            self.requested.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn head(engine: &Engine) -> (i16, i16) {
        engine.snapshot().snake[0]
    }

    fn started_engine(direction: Direction) -> Engine {
        let mut engine = Engine::new(INITIAL_TICK_INTERVAL_MS, 5);
        engine.set_food((0, 0));
        assert!(engine.request_direction(direction));
        engine
    }

    #[test]
    fn test_renders_every_frame_but_ticks_on_interval() {
        let mut engine = started_engine(Direction::Up);
        let mut events = RecordingEvents::default();
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();
        let mut renders = 0;

        scheduler.start(&mut host);
        for t in [16.0, 32.0, 100.0, 150.0] {
            scheduler
                .on_frame(t, &mut engine, &mut events, &mut host, |_, _| {
                    renders += 1;
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(renders, 4);
        assert_eq!(head(&engine), (10, 10));

        // Strictly greater than the interval.
        scheduler.on_frame(150.5, &mut engine, &mut events, &mut host, |_, _| Ok(())).unwrap();
        assert_eq!(head(&engine), (10, 9));

        scheduler.on_frame(300.0, &mut engine, &mut events, &mut host, |_, _| Ok(())).unwrap();
        assert_eq!(head(&engine), (10, 9));
        scheduler.on_frame(301.0, &mut engine, &mut events, &mut host, |_, _| Ok(())).unwrap();
        assert_eq!(head(&engine), (10, 8));
        assert!(scheduler.is_scheduled());
    }

    #[test]
    fn test_render_sees_post_tick_state() {
        let mut engine = started_engine(Direction::Down);
        let mut events = RecordingEvents::default();
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();
        let mut seen = None;

        scheduler
            .on_frame(200.0, &mut engine, &mut events, &mut host, |snap, _| {
                seen = Some(snap.snake[0]);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, Some((10, 11)));
    }

    #[test]
    fn test_paused_keeps_rendering_without_ticking() {
        let mut engine = started_engine(Direction::Left);
        let mut events = RecordingEvents::default();
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();
        let mut renders = 0;

        engine.toggle_pause();
        for t in [200.0, 400.0, 600.0] {
            scheduler
                .on_frame(t, &mut engine, &mut events, &mut host, |_, _| {
                    renders += 1;
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(renders, 3);
        assert_eq!(head(&engine), (10, 10));
        assert!(scheduler.is_scheduled());

        engine.toggle_pause();
        scheduler.on_frame(800.0, &mut engine, &mut events, &mut host, |_, _| Ok(())).unwrap();
        assert_eq!(head(&engine), (9, 10));
    }

    #[test]
    fn test_game_over_stops_scheduling() {
        let mut engine = started_engine(Direction::Right);
        let mut events = RecordingEvents::default();
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();
        scheduler.start(&mut host);

        let mut t = 0.0;
        while !engine.run_state().game_over {
            t += 200.0;
            scheduler.on_frame(t, &mut engine, &mut events, &mut host, |_, _| Ok(())).unwrap();
            assert!(t < 10_000.0, "snake never hit the wall");
        }

        assert!(!scheduler.is_scheduled());
        let requested = host.requested.len();

        scheduler.stop(&mut host);
        scheduler.stop(&mut host);
        assert!(host.cancelled.is_empty());
        assert_eq!(host.requested.len(), requested);
        assert_eq!(events.game_overs.len(), 1);
    }

    #[test]
    fn test_stop_twice_cancels_once() {
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();

        scheduler.start(&mut host);
        scheduler.start(&mut host);
        assert_eq!(host.requested.len(), 1);

        scheduler.stop(&mut host);
        scheduler.stop(&mut host);
        assert_eq!(host.cancelled, vec![FrameHandle(1)]);
        assert!(!scheduler.is_scheduled());
    }

    #[test]
    fn test_render_error_propagates() {
        let mut engine = started_engine(Direction::Up);
        let mut events = RecordingEvents::default();
        let mut host = MockHost::default();
        let mut scheduler = Scheduler::new();

        let res = scheduler.on_frame(10.0, &mut engine, &mut events, &mut host, |_, _| {
            Err(crate::error::GameError::Config("boom".to_string()))
        });
        assert!(res.is_err());
        assert!(!scheduler.is_scheduled());
    }
}
