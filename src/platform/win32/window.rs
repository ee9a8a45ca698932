// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class and create the top-level window.
//   • Host the Scintilla view and the menu bar.
//   • Run the Win32 message loop with the Ctrl+S / Ctrl+Space accelerators.
//   • Route WM_COMMAND to `App`, and the scroll worker's WM_APP_SCROLL posts
//     to `App::handle_scroll` (the UI thread is the only display mutator).
//   • Expose a safe error-dialog helper for use by main().
//
// `WindowState` lives in a `RefCell` behind GWLP_USERDATA.  Modal dialogs
// run nested message loops; a message that arrives while the state is
// already borrowed finds it busy and is dropped rather than re-entering.

#![allow(unsafe_code)]

use std::{cell::RefCell, ffi::c_void, path::PathBuf};

use tracing::{debug, info};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, BOOL, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::{
            Dwm::{DwmSetWindowAttribute, DWMWA_USE_IMMERSIVE_DARK_MODE},
            Gdi::{GetStockObject, UpdateWindow, HBRUSH, WHITE_BRUSH},
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            HiDpi::{SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2},
            WindowsAndMessaging::{
                AppendMenuW, CheckMenuItem, CreateAcceleratorTableW, CreateMenu, CreateWindowExW,
                DefWindowProcW, DeleteMenu, DestroyAcceleratorTable, DestroyWindow,
                DispatchMessageW, GetMenuItemCount, GetMessageW, GetSystemMetrics,
                GetWindowLongPtrW, LoadCursorW, LoadIconW, PostMessageW, PostQuitMessage,
                RegisterClassExW, SetMenu, SetWindowLongPtrW, SetWindowTextW, ShowWindow,
                TranslateAcceleratorW, TranslateMessage, ACCEL, CS_HREDRAW, CS_VREDRAW,
                FCONTROL, FVIRTKEY, GWLP_USERDATA, HACCEL, HMENU, IDC_ARROW, IDI_APPLICATION,
                MF_BYCOMMAND, MF_BYPOSITION, MF_CHECKED, MF_GRAYED, MF_POPUP, MF_SEPARATOR,
                MF_STRING, MF_UNCHECKED, MSG, SM_CXSCREEN, SM_CYSCREEN, SW_SHOWMAXIMIZED,
                WINDOW_EX_STYLE, WM_APP, WM_CLOSE, WM_COMMAND, WM_DESTROY, WM_NCDESTROY, WM_SIZE, WNDCLASSEXW,
                WS_CLIPCHILDREN, WS_OVERLAPPEDWINDOW,
            },
        },
    },
};

use super::dialogs::{show_error, show_info, wide, Win32Prompter};
use crate::{
    app::{App, APP_NAME},
    editor::scintilla::{SciDll, ScintillaView},
    error::{ChordScrollError, Result},
    scroll::{ScrollQueue, ScrollRequest},
    session::{self, Config, RECENT_CAPACITY},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the main window class.
const CLASS_NAME: PCWSTR = w!("ChordScrollMainWindow");

/// Share of the smaller screen dimension used for the restored window size.
const WINDOW_SCREEN_SHARE: f64 = 0.80;

/// Posted by the scroll worker.  WPARAM carries the run generation.
const WM_APP_SCROLL: u32 = WM_APP + 1;

// ── Menu command IDs ──────────────────────────────────────────────────────────

const IDM_FILE_OPEN: usize = 1001;
const IDM_FILE_SAVE: usize = 1002;
const IDM_FILE_SAVE_AS: usize = 1003;
const IDM_FILE_CLOSE: usize = 1004;
const IDM_FILE_EXIT: usize = 1005;
/// `IDM_RECENT_BASE + n` opens the n-th recent file.
const IDM_RECENT_BASE: usize = 1100;
const IDM_VIEW_DARK: usize = 2001;
const IDM_PLAY_TOGGLE: usize = 3001;
const IDM_PLAY_FASTER: usize = 3002;
const IDM_PLAY_SLOWER: usize = 3003;
const IDM_TEXT_LARGER: usize = 3004;
const IDM_TEXT_SMALLER: usize = 3005;
const IDM_HELP_ABOUT: usize = 9001;

const VK_SPACE: u16 = 0x20;

// ── Scroll queue ──────────────────────────────────────────────────────────────

/// `ScrollQueue` that posts to the main window's message queue.
///
/// Holds the HWND as an integer so it can cross to the worker thread;
/// PostMessageW is safe to call from any thread.
struct WindowQueue(usize);

impl WindowQueue {
    fn new(hwnd: HWND) -> Self {
        Self(hwnd.0 as usize)
    }
}

impl ScrollQueue for WindowQueue {
    fn post(&self, request: ScrollRequest) -> bool {
        let ScrollRequest::Advance { generation } = request;
        // SAFETY: PostMessageW only enqueues; it fails cleanly once the
        // window is destroyed, which ends the worker.
        unsafe {
            PostMessageW(
                HWND(self.0 as *mut c_void),
                WM_APP_SCROLL,
                WPARAM(generation as usize),
                LPARAM(0),
            )
        }
        .is_ok()
    }
}

// ── Window state ──────────────────────────────────────────────────────────────

/// Everything the window procedure needs.  Field order is drop order.
struct WindowState {
    app: App,
    view: ScintillaView,
    _sci_dll: SciDll,
    hwnd: HWND,
    recent_menu: HMENU,
    view_menu: HMENU,
}

impl WindowState {
    fn prompter(&self) -> Win32Prompter {
        Win32Prompter { owner: self.hwnd }
    }

    /// Handle a menu command.  Returns `false` for unknown IDs.
    fn on_command(&mut self, id: usize) -> bool {
        let mut prompter = self.prompter();
        match id {
            IDM_FILE_OPEN => {
                self.app.open_document(None, &mut self.view, &mut prompter);
            }
            IDM_FILE_SAVE => {
                self.app.save_document(false, &mut self.view, &mut prompter);
            }
            IDM_FILE_SAVE_AS => {
                self.app.save_document(true, &mut self.view, &mut prompter);
            }
            IDM_FILE_CLOSE => {
                self.app.close_document(&mut self.view, &mut prompter);
            }
            IDM_VIEW_DARK => {
                self.app.toggle_theme(&mut self.view);
                set_dark_title_bar(self.hwnd, self.app.config.theme.is_dark());
            }
            IDM_PLAY_TOGGLE => {
                self.app.toggle_autoscroll(&mut self.view, WindowQueue::new(self.hwnd));
            }
            IDM_PLAY_FASTER => {
                self.app.adjust_speed(1);
            }
            IDM_PLAY_SLOWER => {
                self.app.adjust_speed(-1);
            }
            IDM_TEXT_LARGER => {
                self.app.adjust_font_size(1, &mut self.view);
            }
            IDM_TEXT_SMALLER => {
                self.app.adjust_font_size(-1, &mut self.view);
            }
            id if (IDM_RECENT_BASE..IDM_RECENT_BASE + RECENT_CAPACITY).contains(&id) => {
                let path = self.app.config.recent.all().get(id - IDM_RECENT_BASE).cloned();
                if let Some(path) = path {
                    self.app.open_document(Some(path), &mut self.view, &mut prompter);
                }
            }
            _ => return false,
        }
        self.refresh();
        true
    }

    /// Bring title, recent-files menu and theme check mark up to date.
    fn refresh(&self) {
        self.refresh_title();
        self.refresh_recent_menu();
        let check = if self.app.config.theme.is_dark() { MF_CHECKED } else { MF_UNCHECKED };
        // SAFETY: view_menu is a valid menu owned by the window's menu bar.
        unsafe {
            let _ = CheckMenuItem(self.view_menu, IDM_VIEW_DARK as u32, (MF_BYCOMMAND | check).0);
        }
    }

    fn refresh_title(&self) {
        let title = wide(&format!("{}    [{}]", self.app.window_title(), self.app.status_text()));
        // SAFETY: hwnd is the live main window; title is null-terminated UTF-16
        // that outlives the call.
        unsafe {
            let _ = SetWindowTextW(self.hwnd, PCWSTR(title.as_ptr()));
        }
    }

    fn refresh_recent_menu(&self) {
        // SAFETY: recent_menu is a valid popup owned by the File menu.  Labels
        // are null-terminated UTF-16 buffers that outlive each AppendMenuW call.
        unsafe {
            for _ in 0..GetMenuItemCount(self.recent_menu).max(0) {
                let _ = DeleteMenu(self.recent_menu, 0, MF_BYPOSITION);
            }
            let recent = self.app.config.recent.all();
            if recent.is_empty() {
                let _ = AppendMenuW(self.recent_menu, MF_STRING | MF_GRAYED, 0, w!("(none)"));
            }
            for (n, path) in recent.iter().enumerate() {
                let label = wide(&format!("&{}: {}", n + 1, path.display()));
                let _ = AppendMenuW(
                    self.recent_menu,
                    MF_STRING,
                    IDM_RECENT_BASE + n,
                    PCWSTR(label.as_ptr()),
                );
            }
        }
    }
}

/// Run `f` on the window's state.
///
/// Returns `None` before the state is installed, after it is torn down, or
/// when it is already borrowed by an outer handler.
fn with_state<R>(hwnd: HWND, f: impl FnOnce(&mut WindowState) -> R) -> Option<R> {
    // SAFETY: GWLP_USERDATA holds either 0 or the pointer installed by run(),
    // which stays valid until WM_NCDESTROY clears it.
    let ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *const RefCell<WindowState>;
    if ptr.is_null() {
        return None;
    }
    // SAFETY: see above; only shared references to the RefCell are created.
    let cell = unsafe { &*ptr };
    let mut state = cell.try_borrow_mut().ok()?;
    Some(f(&mut state))
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the main window, optionally open `initial_path`, and drive the
/// message loop until the user closes the application.
pub(crate) fn run(initial_path: Option<PathBuf>) -> Result<()> {
    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();

    // SAFETY: Must precede all window creation; single call at process start.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(ChordScrollError::from)?;
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;
    let sci_dll = SciDll::load()?;

    let config_path = session::config_path();
    let config = config_path.as_deref().map(Config::load).unwrap_or_default();
    let app = App::new(config, config_path);

    let (hwnd, menus) = create_window(hinstance)?;
    let view = ScintillaView::create(hwnd, hinstance, &sci_dll, app.config.theme)?;
    set_dark_title_bar(hwnd, app.config.theme.is_dark());

    let state = Box::new(RefCell::new(WindowState {
        app,
        view,
        _sci_dll: sci_dll,
        hwnd,
        recent_menu: menus.recent,
        view_menu: menus.view,
    }));
    // SAFETY: hwnd is valid; ownership of the box passes to the window and is
    // reclaimed in WM_NCDESTROY.
    unsafe {
        let _ = SetWindowLongPtrW(hwnd, GWLP_USERDATA, Box::into_raw(state) as isize);
    }
    with_state(hwnd, |s| s.refresh());

    // SAFETY: hwnd was just created and is valid.  Return values (previous
    // visibility, success BOOL) are intentionally ignored.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWMAXIMIZED);
        let _ = UpdateWindow(hwnd);
    }

    #[cfg(debug_assertions)]
    debug!(elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0, "window visible");

    if let Some(path) = initial_path {
        with_state(hwnd, |s| {
            let mut prompter = s.prompter();
            s.app.open_document(Some(path), &mut s.view, &mut prompter);
            s.refresh();
        });
    }

    let accel = create_accelerators()?;
    let result = message_loop(hwnd, accel);
    // SAFETY: accel was created above and is not used after the loop.
    unsafe {
        let _ = DestroyAcceleratorTable(accel);
    }
    result
}

/// Show a modal error dialog with the given message.
///
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    show_error(HWND::default(), &format!("{APP_NAME} \u{2014} Fatal Error"), message);
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION loads a built-in resource that
    // exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(ChordScrollError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW loads a built-in resource.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(ChordScrollError::from)?;

    // SAFETY: GetStockObject with WHITE_BRUSH always returns a valid HGDIOBJ.
    let bg_brush = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

/// Popup menus whose content changes at runtime.
struct Menus {
    recent: HMENU,
    view: HMENU,
}

fn create_window(hinstance: HINSTANCE) -> Result<(HWND, Menus)> {
    // A square of 80% of the smaller screen side, for when the user restores
    // the maximised window; works on multi-monitor setups too.
    // SAFETY: GetSystemMetrics has no preconditions.
    let side = unsafe { GetSystemMetrics(SM_CXSCREEN).min(GetSystemMetrics(SM_CYSCREEN)) };
    let side = (f64::from(side) * WINDOW_SCREEN_SHARE).round() as i32;

    let title = wide(APP_NAME);
    // SAFETY: CLASS_NAME was just registered; hinstance is the exe's module.
    // HWND::default() (null parent) creates a top-level window.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW | WS_CLIPCHILDREN,
            0,
            0,
            side,
            side,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    };

    if hwnd == HWND::default() {
        return Err(last_error("CreateWindowExW"));
    }

    let (bar, menus) = build_menu()?;
    // SAFETY: hwnd and bar are valid handles.
    unsafe { SetMenu(hwnd, bar) }.map_err(ChordScrollError::from)?;

    Ok((hwnd, menus))
}

// ── Menu construction ─────────────────────────────────────────────────────────

fn build_menu() -> Result<(HMENU, Menus)> {
    // SAFETY: CreateMenu has no preconditions; failures propagate through ?.
    // All labels are static null-terminated literals from w!().
    unsafe {
        let bar = CreateMenu().map_err(ChordScrollError::from)?;

        // ── File ──────────────────────────────────────────────────────────────
        let file = CreateMenu().map_err(ChordScrollError::from)?;
        let recent = CreateMenu().map_err(ChordScrollError::from)?;
        AppendMenuW(file, MF_STRING, IDM_FILE_OPEN, w!("&Open…"))?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE, w!("&Save\tCtrl+S"))?;
        AppendMenuW(file, MF_STRING, IDM_FILE_SAVE_AS, w!("Save &as…"))?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(file, MF_STRING, IDM_FILE_CLOSE, w!("&Close"))?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(file, MF_POPUP, recent.0 as usize, w!("&Recent files"))?;
        AppendMenuW(file, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(file, MF_STRING, IDM_FILE_EXIT, w!("E&xit\tAlt+F4"))?;

        // ── View ──────────────────────────────────────────────────────────────
        let view = CreateMenu().map_err(ChordScrollError::from)?;
        AppendMenuW(view, MF_STRING, IDM_VIEW_DARK, w!("&Dark mode"))?;

        // ── Playback ──────────────────────────────────────────────────────────
        let play = CreateMenu().map_err(ChordScrollError::from)?;
        AppendMenuW(play, MF_STRING, IDM_PLAY_TOGGLE, w!("&Play / Stop\tCtrl+Space"))?;
        AppendMenuW(play, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(play, MF_STRING, IDM_PLAY_FASTER, w!("&Faster (+)"))?;
        AppendMenuW(play, MF_STRING, IDM_PLAY_SLOWER, w!("&Slower (−)"))?;
        AppendMenuW(play, MF_SEPARATOR, 0, PCWSTR::null())?;
        AppendMenuW(play, MF_STRING, IDM_TEXT_LARGER, w!("&Larger text"))?;
        AppendMenuW(play, MF_STRING, IDM_TEXT_SMALLER, w!("S&maller text"))?;

        // ── Help ──────────────────────────────────────────────────────────────
        let help = CreateMenu().map_err(ChordScrollError::from)?;
        AppendMenuW(help, MF_STRING, IDM_HELP_ABOUT, w!("&About Chord Scroll…"))?;

        // The uIDNewItem parameter for MF_POPUP is the child HMENU cast to usize.
        AppendMenuW(bar, MF_POPUP, file.0 as usize, w!("&File"))?;
        AppendMenuW(bar, MF_POPUP, view.0 as usize, w!("&View"))?;
        AppendMenuW(bar, MF_POPUP, play.0 as usize, w!("&Playback"))?;
        AppendMenuW(bar, MF_POPUP, help.0 as usize, w!("&Help"))?;

        Ok((bar, Menus { recent, view }))
    }
}

fn create_accelerators() -> Result<HACCEL> {
    let table = [
        ACCEL {
            fVirt: FCONTROL | FVIRTKEY,
            key: u16::from(b'S'),
            cmd: IDM_FILE_SAVE as u16,
        },
        ACCEL {
            fVirt: FCONTROL | FVIRTKEY,
            key: VK_SPACE,
            cmd: IDM_PLAY_TOGGLE as u16,
        },
    ];
    // SAFETY: table is a valid ACCEL slice for the duration of the call; the
    // system copies it.
    unsafe { CreateAcceleratorTableW(&table) }.map_err(ChordScrollError::from)
}

/// Ask DWM for a dark (or light) title bar.  Ignored on systems without it.
fn set_dark_title_bar(hwnd: HWND, dark: bool) {
    let value = BOOL::from(dark);
    // SAFETY: hwnd is valid; value is a BOOL that outlives the call and its
    // size is passed alongside.
    unsafe {
        let _ = DwmSetWindowAttribute(
            hwnd,
            DWMWA_USE_IMMERSIVE_DARK_MODE,
            &value as *const BOOL as *const c_void,
            std::mem::size_of::<BOOL>() as u32,
        );
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(hwnd: HWND, accel: HACCEL) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved; exit the loop.
            0 => break,
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call;
                // hwnd and accel are valid until the loop ends.
                if TranslateAcceleratorW(hwnd, accel, &msg) == 0 {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
            },
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CLOSE => {
            // The borrow must end before DestroyWindow tears the state down.
            let may_close = with_state(hwnd, |s| {
                let mut prompter = s.prompter();
                s.app.request_quit(&mut s.view, &mut prompter)
            })
            .unwrap_or(false);
            if may_close {
                let _ = DestroyWindow(hwnd);
            }
            LRESULT(0)
        }

        WM_DESTROY => {
            with_state(hwnd, |s| s.app.shutdown());
            info!("main window destroyed");
            PostQuitMessage(0);
            LRESULT(0)
        }

        // Children are gone by now, so the DLL behind the view can be freed.
        WM_NCDESTROY => {
            let ptr = SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0) as *mut RefCell<WindowState>;
            if !ptr.is_null() {
                // SAFETY: ptr came from Box::into_raw in run() and was just
                // detached from the window, so no other handler can reach it.
                drop(Box::from_raw(ptr));
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            // lparam low word = new client width, high word = new client height.
            let width = (lparam.0 & 0xFFFF) as i32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as i32;
            with_state(hwnd, |s| s.view.resize(width, height));
            LRESULT(0)
        }

        // ── Scroll worker ─────────────────────────────────────────────────────
        WM_APP_SCROLL => {
            let generation = wparam.0 as u64;
            with_state(hwnd, |s| {
                let was_running = s.app.scroller.is_running();
                s.app.handle_scroll(ScrollRequest::Advance { generation }, &mut s.view);
                if was_running != s.app.scroller.is_running() {
                    s.refresh_title();
                }
            });
            LRESULT(0)
        }

        // ── Commands ──────────────────────────────────────────────────────────
        WM_COMMAND => {
            // Low word of WPARAM is the command identifier.
            let cmd_id = wparam.0 & 0xFFFF;

            match cmd_id {
                IDM_FILE_EXIT => {
                    let _ = PostMessageW(hwnd, WM_CLOSE, WPARAM(0), LPARAM(0));
                    LRESULT(0)
                }

                IDM_HELP_ABOUT => {
                    about_dialog(hwnd);
                    LRESULT(0)
                }

                _ => match with_state(hwnd, |s| s.on_command(cmd_id)) {
                    Some(true) => LRESULT(0),
                    _ => DefWindowProcW(hwnd, msg, wparam, lparam),
                },
            }
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Helper dialogs ────────────────────────────────────────────────────────────

/// Display the "About Chord Scroll" information dialog.
fn about_dialog(hwnd: HWND) {
    let body = concat!(
        "Chord Scroll 0.1.0\n\n",
        "Hands-free autoscrolling for chord and lyric sheets.\n",
        "Play/Stop with Ctrl+Space; adjust speed and text size from the Playback menu.\n\n",
        "Licensed under MIT OR Apache-2.0.",
    );
    show_info(hwnd, "About Chord Scroll", body);
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a
/// `ChordScrollError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> ChordScrollError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    ChordScrollError::Win32 {
        function,
        code: code.0,
    }
}
