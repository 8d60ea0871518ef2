//! TCP adapter for the session gateway.
//!
//! The game side connects to the controller and the two exchange
//! newline-delimited JSON frames of the logical message set. The framing
//! is deliberately minimal; everything the protocol means lives in
//! `dinoai-session::message`.

use std::{
    io::{BufRead as _, BufReader, Write as _},
    net::{TcpListener, TcpStream},
};

use anyhow::Context as _;
use dinoai_session::{ControllerMessage, GameMessage, GatewayError, SessionGateway};

/// Listens for game sessions; one attached session at a time.
#[derive(Debug)]
pub struct GameListener {
    listener: TcpListener,
}

impl GameListener {
    pub fn bind(port: u16) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .with_context(|| format!("failed to bind game transport on port {port}"))?;
        Ok(Self { listener })
    }

    /// Blocks until a game session connects.
    pub fn accept(&self) -> anyhow::Result<TcpGateway> {
        let (stream, peer) = self
            .listener
            .accept()
            .context("failed to accept game connection")?;
        eprintln!("Game session connected from {peer}");
        let reader = BufReader::new(stream.try_clone().context("failed to clone game socket")?);
        Ok(TcpGateway { reader, stream })
    }
}

/// One attached game session speaking line-delimited JSON.
#[derive(Debug)]
pub struct TcpGateway {
    reader: BufReader<TcpStream>,
    stream: TcpStream,
}

impl SessionGateway for TcpGateway {
    fn send(&mut self, message: ControllerMessage) -> Result<(), GatewayError> {
        let mut frame = serde_json::to_string(&message)?;
        frame.push('\n');
        self.stream.write_all(frame.as_bytes())?;
        Ok(())
    }

    fn recv(&mut self) -> Result<GameMessage, GatewayError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(GatewayError::Closed);
            }
            let frame = line.trim();
            if frame.is_empty() {
                continue;
            }
            return Ok(serde_json::from_str(frame)?);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead as _, BufReader, Write as _},
        net::TcpStream,
        thread,
    };

    use super::*;

    #[test]
    fn test_line_json_framing() {
        let listener = GameListener::bind(0).unwrap();
        let addr = listener.listener.local_addr().unwrap();

        let game_side = thread::spawn(move || {
            let stream = TcpStream::connect(addr).unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            assert_eq!(line.trim(), r#"{"type":"start"}"#);

            let mut stream = stream;
            stream
                .write_all(b"{\"type\":\"gameover\",\"scores\":[3.0,1.0]}\n")
                .unwrap();
        });

        let mut gateway = listener.accept().unwrap();
        gateway.send(ControllerMessage::Start).unwrap();
        assert_eq!(
            gateway.recv().unwrap(),
            GameMessage::GameOver {
                scores: vec![3.0, 1.0]
            }
        );
        game_side.join().unwrap();
    }

    #[test]
    fn test_disconnect_is_closed() {
        let listener = GameListener::bind(0).unwrap();
        let addr = listener.listener.local_addr().unwrap();

        let game_side = thread::spawn(move || {
            let stream = TcpStream::connect(addr).unwrap();
            drop(stream);
        });

        let mut gateway = listener.accept().unwrap();
        game_side.join().unwrap();
        assert!(matches!(gateway.recv(), Err(GatewayError::Closed)));
    }

    #[test]
    fn test_garbage_frame_is_codec_error() {
        let listener = GameListener::bind(0).unwrap();
        let addr = listener.listener.local_addr().unwrap();

        let game_side = thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.write_all(b"definitely not json\n").unwrap();
        });

        let mut gateway = listener.accept().unwrap();
        assert!(matches!(gateway.recv(), Err(GatewayError::Codec(_))));
        game_side.join().unwrap();
    }
}
