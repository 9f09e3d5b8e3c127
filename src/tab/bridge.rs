//! Length-prefixed JSON over a Unix socket between the popup and the
//! process that owns the Gmail tab. One request per connection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::inject::dom::MemoryPage;
use crate::inject::{
    COMPOSE_NOT_FOUND_ALERT, InjectResult, InjectionReport, InjectionRequest, Locator,
    ThreadSleeper, run_injection,
};
use crate::tab::{TabError, TabHost, TabInfo, TabResult};

#[cfg(unix)]
use std::os::unix::net::{UnixListener, UnixStream};

const MAX_FRAME: usize = 1 << 20;

/// Per-connection read/write limit on the host side. A client that stalls
/// mid-frame is dropped after this long.
const HOST_IO_TIMEOUT: Duration = Duration::from_secs(2);
/// The popup waits longer, since the host may be finishing another client.
const CLIENT_IO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    Ping,
    ActiveTab,
    Inject {
        tab_id: i64,
        request: InjectionRequest,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub tab: Option<TabInfo>,
}

impl Response {
    fn ok() -> Self {
        Self {
            ok: true,
            message: None,
            tab: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            tab: None,
        }
    }
}

pub fn write_frame<W: Write, T: Serialize>(w: &mut W, value: &T) -> TabResult<()> {
    let data = serde_json::to_vec(value)?;
    if data.len() > MAX_FRAME {
        return Err(TabError::Bridge(format!(
            "request too large ({} bytes, limit {MAX_FRAME})",
            data.len()
        )));
    }
    w.write_all(&(data.len() as u32).to_be_bytes())?;
    w.write_all(&data)?;
    w.flush()?;
    Ok(())
}

pub fn read_frame<R: Read, T: DeserializeOwned>(r: &mut R) -> TabResult<T> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let n = u32::from_be_bytes(len_buf) as usize;
    if n > MAX_FRAME {
        return Err(TabError::Bridge(format!("frame of {n} bytes exceeds limit")));
    }
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    Ok(serde_json::from_slice(&buf)?)
}

/// Popup-side client of the bridge.
pub struct SocketTabHost {
    path: PathBuf,
}

impl SocketTabHost {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(unix)]
    fn send(&self, req: &Request) -> TabResult<Response> {
        let mut s = UnixStream::connect(&self.path).map_err(|e| {
            TabError::Bridge(format!("cannot reach {}: {e}", self.path.display()))
        })?;
        s.set_read_timeout(Some(CLIENT_IO_TIMEOUT))?;
        s.set_write_timeout(Some(CLIENT_IO_TIMEOUT))?;
        write_frame(&mut s, req)?;
        let resp: Response = read_frame(&mut s)?;
        if !resp.ok {
            return Err(TabError::Bridge(
                resp.message.unwrap_or_else(|| "request refused".to_string()),
            ));
        }
        Ok(resp)
    }

    #[cfg(not(unix))]
    fn send(&self, _req: &Request) -> TabResult<Response> {
        Err(TabError::Bridge(
            "tab bridge not supported on this platform".into(),
        ))
    }
}

impl TabHost for SocketTabHost {
    fn active_tab(&self) -> TabResult<TabInfo> {
        self.send(&Request::ActiveTab)?
            .tab
            .ok_or_else(|| TabError::Bridge("bridge reported no active tab".into()))
    }

    fn dispatch(&self, tab: &TabInfo, request: &InjectionRequest) -> TabResult<()> {
        self.send(&Request::Inject {
            tab_id: tab.id,
            request: request.clone(),
        })?;
        Ok(())
    }
}

/// Host side: one tab backed by an in-memory page.
#[derive(Debug, Clone)]
pub struct HostedTab {
    pub tab: TabInfo,
    pub page: MemoryPage,
    pub locator: Locator,
}

impl HostedTab {
    /// Answers a request. An accepted `Inject` starts the injection on its own
    /// thread and returns its handle; the response never waits for it.
    pub fn handle(
        &self,
        req: Request,
    ) -> (Response, Option<JoinHandle<InjectResult<InjectionReport>>>) {
        match req {
            Request::Ping => (Response::ok(), None),
            Request::ActiveTab => (
                Response {
                    tab: Some(self.tab.clone()),
                    ..Response::ok()
                },
                None,
            ),
            Request::Inject { tab_id, request } => {
                if tab_id != self.tab.id {
                    return (Response::err(format!("no tab with id {tab_id}")), None);
                }
                let page = self.page.clone();
                let locator = self.locator;
                let handle = thread::spawn(move || {
                    let res = run_injection(&page, &mut ThreadSleeper, &locator, &request);
                    if let Err(e) = &res {
                        log::warn!("{e}");
                        eprintln!("ALERT: {COMPOSE_NOT_FOUND_ALERT}");
                    }
                    res
                });
                (Response::ok(), Some(handle))
            }
        }
    }
}

/// Serves `hosted` on `path` until `running` is cleared.
#[cfg(unix)]
pub fn serve(
    path: &Path,
    hosted: &HostedTab,
    running: &std::sync::atomic::AtomicBool,
) -> TabResult<()> {
    use std::sync::atomic::Ordering;

    if path.exists() {
        std::fs::remove_file(path)?;
    }
    let listener = UnixListener::bind(path)?;
    listener.set_nonblocking(true)?;
    log::info!("tab bridge listening on {}", path.display());

    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((mut stream, _)) => {
                if let Err(e) = serve_one(&mut stream, hosted) {
                    log::warn!("bridge connection failed: {e}");
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(e.into()),
        }
    }

    let _ = std::fs::remove_file(path);
    Ok(())
}

#[cfg(not(unix))]
pub fn serve(
    _path: &Path,
    _hosted: &HostedTab,
    _running: &std::sync::atomic::AtomicBool,
) -> TabResult<()> {
    Err(TabError::Bridge(
        "tab bridge not supported on this platform".into(),
    ))
}

#[cfg(unix)]
fn serve_one(stream: &mut UnixStream, hosted: &HostedTab) -> TabResult<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(HOST_IO_TIMEOUT))?;
    stream.set_write_timeout(Some(HOST_IO_TIMEOUT))?;
    let req: Request = read_frame(stream)?;
    log::debug!("bridge request: {req:?}");
    // Detached: the injection outlives the popup's connection.
    let (resp, _injection) = hosted.handle(req);
    write_frame(stream, &resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Recipients;
    use crate::inject::{InjectError, TemplateContent};
    use std::io::Cursor;

    fn hosted() -> HostedTab {
        HostedTab {
            tab: TabInfo {
                id: 7,
                url: "https://mail.google.com/mail/u/0/#inbox".into(),
            },
            page: MemoryPage::new(),
            locator: Locator::new(5, Duration::from_millis(5)),
        }
    }

    #[test]
    fn frames_carry_tagged_requests() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &Request::ActiveTab).expect("write frame");
        assert_eq!(&buf[..4], &(buf.len() as u32 - 4).to_be_bytes());
        assert!(String::from_utf8_lossy(&buf[4..]).contains(r#""cmd":"active_tab""#));

        let back: Request = read_frame(&mut Cursor::new(buf)).expect("read frame");
        assert_eq!(back, Request::ActiveTab);
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let mut buf = ((MAX_FRAME + 1) as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(b"{}");
        let res: TabResult<Request> = read_frame(&mut Cursor::new(buf));
        assert!(matches!(res, Err(TabError::Bridge(_))));
    }

    #[test]
    fn oversized_requests_are_refused_before_writing() {
        let req = Request::Inject {
            tab_id: 7,
            request: InjectionRequest {
                template: Some(TemplateContent {
                    subject: "Big".into(),
                    body: "x".repeat(MAX_FRAME),
                }),
                recipients: Recipients::default(),
            },
        };
        let mut buf = Vec::new();
        let err = write_frame(&mut buf, &req).expect_err("frame over the limit");
        assert!(matches!(&err, TabError::Bridge(m) if m.contains("request too large")));
        assert!(buf.is_empty());
    }

    #[test]
    fn active_tab_is_reported() {
        let h = hosted();
        let (resp, job) = h.handle(Request::ActiveTab);
        assert!(resp.ok);
        assert!(job.is_none());
        assert_eq!(resp.tab, Some(h.tab.clone()));
    }

    #[test]
    fn inject_for_unknown_tab_is_refused() {
        let h = hosted();
        let (resp, job) = h.handle(Request::Inject {
            tab_id: 99,
            request: InjectionRequest::default(),
        });
        assert!(!resp.ok);
        assert!(job.is_none());
    }

    #[test]
    fn inject_runs_against_the_hosted_page() {
        let h = hosted();
        let compose = h.page.add_compose_dialog(true);
        let (resp, job) = h.handle(Request::Inject {
            tab_id: 7,
            request: InjectionRequest {
                template: Some(TemplateContent {
                    subject: "Hello".into(),
                    body: "World".into(),
                }),
                recipients: Recipients::default(),
            },
        });
        assert!(resp.ok);
        let report = job
            .expect("injection thread")
            .join()
            .expect("injection thread panicked")
            .expect("compose dialog present");
        assert_eq!(report.written.len(), 2);
        assert_eq!(h.page.value_of(compose.subject), "Hello");
    }

    #[test]
    fn accepted_inject_still_times_out_on_the_host() {
        let h = hosted();
        let (resp, job) = h.handle(Request::Inject {
            tab_id: 7,
            request: InjectionRequest::default(),
        });
        // Dispatch is acknowledged before the search finishes.
        assert!(resp.ok);
        let res = job.expect("injection thread").join().expect("no panic");
        assert!(matches!(res, Err(InjectError::LocatorTimeout { attempts: 5, .. })));
    }
}
