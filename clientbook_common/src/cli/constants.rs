/// CLI Commands

pub const REGISTER: &str = "register";
pub const SEARCH: &str = "search";
pub const LIST: &str = "list";
pub const DEPOSIT: &str = "deposit";
pub const WITHDRAW: &str = "withdraw";
pub const TRANSFER: &str = "transfer";
pub const LEDGER: &str = "ledger";
pub const HELP: &str = "help";
pub const QUIT: &str = "quit";

/// Various CLI constants

pub const PROMPT: &str = "=> ";
pub const DOCUMENT_PROMPT: &str = "Enter document (11 or 14 characters): ";
pub const NAME_PROMPT: &str = "Enter name: ";
pub const EMAIL_PROMPT: &str = "Enter email: ";
pub const KIND_PROMPT: &str = "Enter client type (pf/pj): ";
pub const AMOUNT_PROMPT: &str = "Enter amount: ";
pub const SENDER_PROMPT: &str = "Enter sender's document: ";
pub const RECIPIENT_PROMPT: &str = "Enter receiver's document: ";
