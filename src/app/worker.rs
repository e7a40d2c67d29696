use std::sync::mpsc;
use std::time::Duration;

pub(super) const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(24);
pub(super) const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `work` off the UI thread and hands its result back on the main loop.
pub(super) fn spawn_worker_action<T, W, H>(work: W, mut on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnMut(T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });

    gtk4::glib::timeout_add_local(WORKER_POLL_INTERVAL, move || match rx.try_recv() {
        Ok(result) => {
            on_result(result);
            gtk4::glib::ControlFlow::Break
        }
        Err(mpsc::TryRecvError::Empty) => gtk4::glib::ControlFlow::Continue,
        Err(mpsc::TryRecvError::Disconnected) => gtk4::glib::ControlFlow::Break,
    });
}

/// Drains a long-lived channel on the main loop until its sender goes away.
pub(super) fn poll_channel<T, R, H>(interval: Duration, mut try_recv: R, mut on_item: H)
where
    T: 'static,
    R: FnMut() -> Result<T, mpsc::TryRecvError> + 'static,
    H: FnMut(T) + 'static,
{
    gtk4::glib::timeout_add_local(interval, move || loop {
        match try_recv() {
            Ok(item) => on_item(item),
            Err(mpsc::TryRecvError::Empty) => break gtk4::glib::ControlFlow::Continue,
            Err(mpsc::TryRecvError::Disconnected) => break gtk4::glib::ControlFlow::Break,
        }
    });
}
