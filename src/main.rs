mod click;
mod codec;
mod ipc;
mod store;

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

fn emit(stdout: &mut io::Stdout, value: &serde_json::Value) {
    let _ = writeln!(
        stdout,
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{\"ok\":false}".to_string())
    );
    let _ = stdout.flush();
}

fn main() {
    // Keep this binary dependency-light. One logic thread owns all state;
    // a reader thread only ferries stdin lines into the channel.
    let mut state = ipc::AppState::new();

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    loop {
        // Block on the channel, but no longer than the click window: the
        // receive timeout doubles as the single-shot debounce timer.
        let received = match state.clicks.deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(line) => Some(line),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        let Some(line) = received else {
            // The pending click outlived its window with no double click:
            // commit it as an edit intent.
            if let Some(ev) = ipc::mature_click(&mut state, Instant::now()) {
                emit(&mut stdout, &ev);
            }
            continue;
        };

        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply with an id; report the parse failure as-is.
                let _ = writeln!(
                    stdout,
                    "{{\"ok\":false,\"error\":{{\"code\":\"bad_json\",\"message\":\"{}\"}}}}",
                    e
                );
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        emit(&mut stdout, &resp);
    }
}
