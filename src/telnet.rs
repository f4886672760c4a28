//! Telnet command byte table and prompt character set
//!
//! This module defines the fixed mapping between symbolic telnet command
//! names and their single-byte wire codes, along with the set of characters
//! recognized as interactive command-prompt terminators.

/// Default telnet port
pub const DEFAULT_PORT: u16 = 23;

/// Characters recognized as command-prompt terminators on the remote host.
///
/// The order is significant: these are appended, in order, after the login
/// failure phrase when building the expected-phrase list, so each prompt's
/// match index is stable.
pub const PROMPT_CHARS: [u8; 5] = [b':', b'>', b'$', b'#', b'%'];

/// Telnet command codes (RFC 854)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelnetCommand {
    /// Subnegotiation End
    SE = 240,
    /// No Operation
    NOP = 241,
    /// Data Mark
    DM = 242,
    /// Break
    BRK = 243,
    /// Interrupt Process
    IP = 244,
    /// Abort Output
    AO = 245,
    /// Are You There
    AYT = 246,
    /// Erase Character
    EC = 247,
    /// Erase Line
    EL = 248,
    /// Go Ahead
    GA = 249,
    /// Subnegotiation Begin
    SB = 250,
    WILL = 251,
    WONT = 252,
    DO = 253,
    DONT = 254,
    /// Interpret As Command
    IAC = 255,
}

impl TelnetCommand {
    /// Reverse lookup from a wire byte. Codes are unique across the table,
    /// so this mapping is unambiguous.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            240 => Some(TelnetCommand::SE),
            241 => Some(TelnetCommand::NOP),
            242 => Some(TelnetCommand::DM),
            243 => Some(TelnetCommand::BRK),
            244 => Some(TelnetCommand::IP),
            245 => Some(TelnetCommand::AO),
            246 => Some(TelnetCommand::AYT),
            247 => Some(TelnetCommand::EC),
            248 => Some(TelnetCommand::EL),
            249 => Some(TelnetCommand::GA),
            250 => Some(TelnetCommand::SB),
            251 => Some(TelnetCommand::WILL),
            252 => Some(TelnetCommand::WONT),
            253 => Some(TelnetCommand::DO),
            254 => Some(TelnetCommand::DONT),
            255 => Some(TelnetCommand::IAC),
            _ => None,
        }
    }

    /// Symbolic mnemonic used when decoding traffic for the debug stream
    pub fn name(&self) -> &'static str {
        match self {
            TelnetCommand::SE => "SE",
            TelnetCommand::NOP => "NOP",
            TelnetCommand::DM => "DM",
            TelnetCommand::BRK => "BRK",
            TelnetCommand::IP => "IP",
            TelnetCommand::AO => "AO",
            TelnetCommand::AYT => "AYT",
            TelnetCommand::EC => "EC",
            TelnetCommand::EL => "EL",
            TelnetCommand::GA => "GA",
            TelnetCommand::SB => "SB",
            TelnetCommand::WILL => "WILL",
            TelnetCommand::WONT => "WONT",
            TelnetCommand::DO => "DO",
            TelnetCommand::DONT => "DONT",
            TelnetCommand::IAC => "IAC",
        }
    }
}
