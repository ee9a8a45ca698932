// ── Autoscroll controller ─────────────────────────────────────────────────────
//
// Two states, `Idle` and `Running`.  All transitions happen on the UI thread.
// While running, a single background worker posts `ScrollRequest::Advance`
// to the UI thread's queue once per interval; the UI thread applies it to the
// `DisplaySurface` through `AutoscrollController::handle`.  The worker never
// touches the display and never flips the running state itself.
//
// Stop is cooperative: the worker polls a shared flag every `POLL_INTERVAL`,
// so a stop takes effect within ~0.1 s even at very low speeds.

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering},
        mpsc, Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{document::Settings, editor::DisplaySurface};

// ── Limits ────────────────────────────────────────────────────────────────────

/// Scroll steps per minute for a new session.
pub(crate) const DEFAULT_SPEED: u32 = 30;
/// Speeds must stay strictly between these bounds.
const SPEED_BOUNDS: (i64, i64) = (0, 1000);

pub(crate) const DEFAULT_FONT_SIZE: u32 = 14;
/// Inclusive font size range, in points.
const FONT_SIZE_RANGE: std::ops::RangeInclusive<i64> = 8..=72;

/// Blank lines inserted above the content when a run starts, so there is
/// always something to scroll into before the first line moves.
pub(crate) const PADDING_LINES: usize = 20;

/// How often the worker checks for a stop request while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) fn speed_in_range(speed: i64) -> bool {
    speed > SPEED_BOUNDS.0 && speed < SPEED_BOUNDS.1
}

pub(crate) fn font_size_in_range(size: i64) -> bool {
    FONT_SIZE_RANGE.contains(&size)
}

/// Time between two scroll steps at `speed` steps per minute.
pub(crate) fn tick_interval(speed: u32) -> Duration {
    Duration::from_secs_f64(60.0 / f64::from(speed.max(1)))
}

// ── Worker → UI messages ──────────────────────────────────────────────────────

/// Request posted by the scroll worker to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScrollRequest {
    /// Scroll one unit, unless the run identified by `generation` has ended.
    Advance { generation: u64 },
}

/// The UI thread's task queue, as seen from the scroll worker.
pub(crate) trait ScrollQueue: Send + 'static {
    /// Enqueue `request`.  Returns `false` when the UI side is gone, which
    /// ends the worker.
    fn post(&self, request: ScrollRequest) -> bool;
}

impl ScrollQueue for mpsc::Sender<ScrollRequest> {
    fn post(&self, request: ScrollRequest) -> bool {
        self.send(request).is_ok()
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Playback state for the open view.
pub(crate) struct AutoscrollController {
    running: bool,
    /// Shared with the worker so speed changes apply to the next interval.
    speed: Arc<AtomicU32>,
    font_size: u32,
    /// Incremented per run; stale `Advance` requests are discarded.
    generation: u64,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Default for AutoscrollController {
    fn default() -> Self {
        Self {
            running: false,
            speed: Arc::new(AtomicU32::new(DEFAULT_SPEED)),
            font_size: DEFAULT_FONT_SIZE,
            generation: 0,
            stop_flag: Arc::new(AtomicBool::new(true)),
            worker: None,
        }
    }
}

impl AutoscrollController {
    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn speed(&self) -> u32 {
        self.speed.load(Ordering::Relaxed)
    }

    pub(crate) fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Current speed and font size, as embedded on save.
    pub(crate) fn settings(&self) -> Settings {
        Settings {
            speed: self.speed(),
            font_size: self.font_size,
        }
    }

    /// `true` while a previous run's worker has not exited yet.
    fn worker_alive(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }

    // ── Transitions ───────────────────────────────────────────────────────────

    /// `Idle → Running`.
    ///
    /// Refused (returns `false`) when already running or when the previous
    /// worker is still winding down.
    pub(crate) fn start<S, Q>(&mut self, surface: &mut S, queue: Q) -> bool
    where
        S: DisplaySurface + ?Sized,
        Q: ScrollQueue,
    {
        if self.running || self.worker_alive() {
            debug!(running = self.running, "autoscroll start refused");
            return false;
        }

        if surface.scroll_fraction() >= 1.0 {
            surface.scroll_to_top();
        }
        surface.insert_padding_at_top(PADDING_LINES);
        surface.set_editable(false);

        self.running = true;
        self.generation += 1;
        self.stop_flag = Arc::new(AtomicBool::new(false));

        let generation = self.generation;
        let stop = Arc::clone(&self.stop_flag);
        let speed = Arc::clone(&self.speed);
        let spawned = thread::Builder::new()
            .name("scroll-worker".to_owned())
            .spawn(move || run_worker(&queue, &stop, &speed, generation));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!(generation, speed = self.speed(), "autoscroll started");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to spawn scroll worker");
                self.stop(surface);
                false
            }
        }
    }

    /// `Running → Idle`.  Returns `false` if nothing was running.
    pub(crate) fn stop<S>(&mut self, surface: &mut S) -> bool
    where
        S: DisplaySurface + ?Sized,
    {
        if !self.running {
            return false;
        }
        self.running = false;
        self.stop_flag.store(true, Ordering::Release);
        surface.set_editable(true);
        surface.remove_padding_at_top();
        info!(generation = self.generation, "autoscroll stopped");
        true
    }

    /// Apply a request posted by the worker.  Runs on the UI thread.
    ///
    /// Stops the run once the end of the document is visible.
    pub(crate) fn handle<S>(&mut self, request: ScrollRequest, surface: &mut S)
    where
        S: DisplaySurface + ?Sized,
    {
        match request {
            ScrollRequest::Advance { generation } => {
                if !self.running || generation != self.generation {
                    return;
                }
                if surface.scroll_fraction() >= 1.0 {
                    debug!(generation, "end of document reached");
                    self.stop(surface);
                    return;
                }
                surface.scroll_by_one_unit();
            }
        }
    }

    /// Signal the worker to exit and stop tracking it.  Used at shutdown,
    /// when the display is already gone.
    pub(crate) fn abandon(&mut self) {
        self.running = false;
        self.stop_flag.store(true, Ordering::Release);
        self.worker = None;
    }

    // ── Adjustments ───────────────────────────────────────────────────────────

    /// Change the speed by `delta`.  Results outside `(0, 1000)` are ignored.
    pub(crate) fn adjust_speed(&mut self, delta: i32) -> u32 {
        let current = self.speed();
        self.set_speed(i64::from(current) + i64::from(delta));
        self.speed()
    }

    /// Set the speed.  Values outside `(0, 1000)` are ignored.
    pub(crate) fn set_speed(&mut self, speed: i64) -> bool {
        match u32::try_from(speed) {
            Ok(speed) if speed_in_range(i64::from(speed)) => {
                self.speed.store(speed, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    /// Grow or shrink the text by `delta` points, relative to the size the
    /// surface currently shows.  Results outside `[8, 72]` are ignored.
    pub(crate) fn adjust_font_size<S>(&mut self, delta: i32, surface: &mut S) -> u32
    where
        S: DisplaySurface + ?Sized,
    {
        let target = i64::from(surface.font_size()) + i64::from(delta);
        self.set_font_size(target, surface);
        self.font_size
    }

    /// Set the text size.  Values outside `[8, 72]` are ignored.
    pub(crate) fn set_font_size<S>(&mut self, size: i64, surface: &mut S) -> bool
    where
        S: DisplaySurface + ?Sized,
    {
        match u32::try_from(size) {
            Ok(size) if font_size_in_range(i64::from(size)) => {
                self.font_size = size;
                surface.set_font_size(size);
                true
            }
            _ => false,
        }
    }
}

impl Drop for AutoscrollController {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

fn run_worker<Q: ScrollQueue>(
    queue: &Q,
    stop: &AtomicBool,
    speed: &AtomicU32,
    generation: u64,
) {
    while !stop.load(Ordering::Acquire) {
        if !queue.post(ScrollRequest::Advance { generation }) {
            debug!(generation, "UI queue closed");
            break;
        }
        let deadline = Instant::now() + tick_interval(speed.load(Ordering::Relaxed));
        while !stop.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
    debug!(generation, "scroll worker exited");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::memory::MemorySurface;

    fn long_text(lines: usize) -> String {
        (1..=lines).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n")
    }

    /// Wait until the previous run's worker has exited.
    fn wait_for_worker(ctl: &AutoscrollController) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while ctl.worker_alive() {
            assert!(Instant::now() < deadline, "worker did not exit");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn speed_clamps_at_both_ends() {
        let mut ctl = AutoscrollController::default();
        assert_eq!(ctl.speed(), 30);
        for _ in 0..970 {
            ctl.adjust_speed(1);
        }
        assert_eq!(ctl.speed(), 999);
        assert_eq!(ctl.adjust_speed(1), 999);

        assert!(ctl.set_speed(1));
        assert_eq!(ctl.adjust_speed(-1), 1);
        assert!(!ctl.set_speed(-3));
        assert_eq!(ctl.speed(), 1);
    }

    #[test]
    fn font_size_outside_range_is_ignored() {
        let mut ctl = AutoscrollController::default();
        let mut surface = MemorySurface::new("x", 10);
        assert!(ctl.set_font_size(72, &mut surface));
        assert_eq!(ctl.adjust_font_size(1, &mut surface), 72);
        assert!(ctl.set_font_size(8, &mut surface));
        assert_eq!(ctl.adjust_font_size(-1, &mut surface), 8);
        assert_eq!(surface.font_size, 8);
        assert!(!ctl.set_font_size(100, &mut surface));
        assert_eq!(ctl.font_size(), 8);
    }

    #[test]
    fn tick_interval_follows_speed() {
        assert_eq!(tick_interval(60), Duration::from_secs(1));
        assert_eq!(tick_interval(30), Duration::from_secs(2));
        assert_eq!(tick_interval(600), Duration::from_millis(100));
    }

    #[test]
    fn start_then_stop_restores_content() {
        let original = long_text(100);
        let mut surface = MemorySurface::new(&original, 10);
        let mut ctl = AutoscrollController::default();
        let (tx, _rx) = mpsc::channel();

        assert!(ctl.start(&mut surface, tx));
        assert!(ctl.is_running());
        assert!(!surface.editable, "editing disabled while running");
        assert!(surface.text.starts_with(&"\n".repeat(PADDING_LINES)));

        assert!(ctl.stop(&mut surface));
        assert!(!ctl.is_running());
        assert!(surface.editable, "editing re-enabled after stop");
        assert_eq!(surface.text, original);
        wait_for_worker(&ctl);
    }

    #[test]
    fn second_start_is_refused_while_running() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        let mut ctl = AutoscrollController::default();
        let (tx, _rx) = mpsc::channel();

        assert!(ctl.start(&mut surface, tx.clone()));
        assert!(!ctl.start(&mut surface, tx));
        assert_eq!(surface.text.matches('\n').count(), 99 + PADDING_LINES);
        ctl.stop(&mut surface);
        wait_for_worker(&ctl);
    }

    #[test]
    fn start_at_end_rewinds_to_top() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        surface.scroll_to_end();
        assert_eq!(surface.scroll_fraction(), 1.0);

        let mut ctl = AutoscrollController::default();
        let (tx, _rx) = mpsc::channel();
        assert!(ctl.start(&mut surface, tx));
        assert_eq!(surface.first_line, 0);
        ctl.stop(&mut surface);
        wait_for_worker(&ctl);
    }

    #[test]
    fn worker_posts_advance_requests_for_its_generation() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        let mut ctl = AutoscrollController::default();
        ctl.set_speed(999);
        let (tx, rx) = mpsc::channel();

        assert!(ctl.start(&mut surface, tx));
        for _ in 0..3 {
            let req = rx.recv_timeout(Duration::from_secs(2)).expect("advance request");
            assert_eq!(req, ScrollRequest::Advance { generation: 1 });
            ctl.handle(req, &mut surface);
        }
        assert_eq!(surface.first_line, 3);
        ctl.stop(&mut surface);
        wait_for_worker(&ctl);
    }

    #[test]
    fn stop_is_noticed_within_poll_interval() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        let mut ctl = AutoscrollController::default();
        ctl.set_speed(1); // one step per minute
        let (tx, rx) = mpsc::channel();

        assert!(ctl.start(&mut surface, tx));
        rx.recv_timeout(Duration::from_secs(2)).expect("first request");
        let stopped_at = Instant::now();
        ctl.stop(&mut surface);
        wait_for_worker(&ctl);
        assert!(stopped_at.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn reaching_the_end_stops_the_run() {
        let original = long_text(12);
        let mut surface = MemorySurface::new(&original, 10);
        let mut ctl = AutoscrollController::default();
        let (tx, _rx) = mpsc::channel();
        assert!(ctl.start(&mut surface, tx));

        // 12 lines + 20 padding in a 10-line viewport: 22 steps to the end.
        let mut steps = 0;
        while ctl.is_running() {
            ctl.handle(ScrollRequest::Advance { generation: 1 }, &mut surface);
            steps += 1;
            assert!(steps < 100, "run never ended");
        }
        assert_eq!(steps, 23);
        assert!(surface.editable);
        assert_eq!(surface.text, original);
        wait_for_worker(&ctl);
    }

    #[test]
    fn stale_requests_are_ignored() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        let mut ctl = AutoscrollController::default();

        ctl.handle(ScrollRequest::Advance { generation: 0 }, &mut surface);
        assert_eq!(surface.first_line, 0, "idle controller ignores requests");

        let (tx, _rx) = mpsc::channel();
        assert!(ctl.start(&mut surface, tx));
        ctl.handle(ScrollRequest::Advance { generation: 7 }, &mut surface);
        assert_eq!(surface.first_line, 0, "foreign generation ignored");
        ctl.stop(&mut surface);
        wait_for_worker(&ctl);
    }

    #[test]
    fn worker_exits_when_queue_is_dropped() {
        let mut surface = MemorySurface::new(&long_text(100), 10);
        let mut ctl = AutoscrollController::default();
        ctl.set_speed(999);
        let (tx, rx) = mpsc::channel();
        assert!(ctl.start(&mut surface, tx));
        drop(rx);
        wait_for_worker(&ctl);
        assert!(ctl.is_running(), "UI state is only changed on the UI thread");
        ctl.stop(&mut surface);
    }
}
