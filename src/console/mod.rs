//! Line commands of the daemon console. They act like a remote client (via
//! the protocol bridge) and like a user handling the simulated lock.

use crate::AttError;
use crate::Attribute;
use crate::LinkSecurity;
use crate::LockNode;
use crate::OwnerId;
use crate::PhysicalPosition;
use crate::ProtocolError;
use crate::SimulatedBoard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    State,
    Describe,
    Claim(OwnerId),
    Release(OwnerId),
    Open,
    Close,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0} <uuid>")]
    MissingOwner(&'static str),

    #[error(transparent)]
    BadOwner(ProtocolError),
}

pub const CONSOLE_HELP: &str = "commands: state | describe | claim <uuid> | release <uuid> | open | close | help";

impl ConsoleCommand {
    /// Parses one input line; `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(None);
        };

        let command = match cmd.to_ascii_lowercase().as_str() {
            "state" => ConsoleCommand::State,
            "describe" => ConsoleCommand::Describe,
            "claim" => ConsoleCommand::Claim(parse_owner(words.next(), "claim")?),
            "release" => ConsoleCommand::Release(parse_owner(words.next(), "release")?),
            "open" => ConsoleCommand::Open,
            "close" => ConsoleCommand::Close,
            "help" | "?" => ConsoleCommand::Help,
            other => return Err(ConsoleError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Runs the command and returns the reply line.
    pub fn execute(
        &self,
        node: &LockNode,
        board: &SimulatedBoard,
    ) -> String {
        let bridge = node.bridge();
        let link = LinkSecurity::secure();
        match self {
            ConsoleCommand::State => match bridge.read(Attribute::State) {
                Ok(value) => format!("state: {:?} ({})", value, node.state()),
                Err(e) => att_reply(e),
            },
            ConsoleCommand::Describe => match bridge.read(Attribute::StateDescription) {
                Ok(value) => String::from_utf8_lossy(&value).into_owned(),
                Err(e) => att_reply(e),
            },
            ConsoleCommand::Claim(owner) => match bridge.write(Attribute::RequestClaim, owner.as_bytes(), link) {
                Ok(state) => format!("claim accepted, now {}", state),
                Err(e) => att_reply(e),
            },
            ConsoleCommand::Release(owner) => {
                match bridge.write(Attribute::RequestRelease, owner.as_bytes(), link) {
                    Ok(state) => format!("release accepted, now {}", state),
                    Err(e) => att_reply(e),
                }
            }
            ConsoleCommand::Open => {
                board.move_to(PhysicalPosition::Open);
                "lock opened".to_string()
            }
            ConsoleCommand::Close => {
                board.move_to(PhysicalPosition::Closed);
                "lock closed".to_string()
            }
            ConsoleCommand::Help => CONSOLE_HELP.to_string(),
        }
    }
}

fn parse_owner(
    word: Option<&str>,
    cmd: &'static str,
) -> Result<OwnerId, ConsoleError> {
    let word = word.ok_or(ConsoleError::MissingOwner(cmd))?;
    OwnerId::parse_str(word).map_err(ConsoleError::BadOwner)
}

fn att_reply(e: AttError) -> String {
    format!("error 0x{:02X}: {}", e.code(), e)
}
