/*! The input relay thread feeding terminal events into a channel. */

use std::{sync::mpsc, thread};

use crossterm::event::{self, Event};

/// Spawns the reader thread behind the given channel.
///
/// Game screens wait on the receiving end with `recv_timeout`, so one place
/// serves both keyboard input and tick deadlines. The thread runs until the
/// receiver hangs up or the terminal event stream fails.
pub fn spawn(input_sender: mpsc::Sender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let Ok(event) = event::read() else {
            return;
        };
        if input_sender.send(event).is_err() {
            return;
        }
    })
}
