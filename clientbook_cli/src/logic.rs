use clientbook_common::cli::constants::*;
use clientbook_common::cli::helpers::*;
use clientbook_common::tx::Tx;
use clientbook_common::{ledger, Amount, ClientKind, ClientStore, RegistryError};
use log::warn;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// **A menu entry**
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Register,
    Search,
    List,
    Deposit,
    Withdraw,
    Transfer,
    Ledger,
    Help,
    Quit,
}

impl Command {
    /// Accepts the menu number, the full command name, or its one-letter short form.
    pub fn parse(choice: &str) -> Option<Self> {
        let cmd = choice.trim().to_lowercase();

        match cmd.as_str() {
            "1" | REGISTER | "r" => Some(Command::Register),
            "2" | SEARCH | "s" => Some(Command::Search),
            "3" | LIST | "l" => Some(Command::List),
            "4" | DEPOSIT | "d" => Some(Command::Deposit),
            "5" | WITHDRAW | "w" => Some(Command::Withdraw),
            "6" | TRANSFER | "t" => Some(Command::Transfer),
            "7" | LEDGER | "g" => Some(Command::Ledger),
            "8" | HELP | "h" => Some(Command::Help),
            "0" | QUIT | "q" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// **Runs the menu until the user quits or `input` is closed.**
///
/// The store is borrowed for the whole session; the caller closes it afterwards.
/// Errors from individual operations are written to `out` and logged,
/// and the loop goes on.
///
/// # Errors
/// Only I/O errors on `out` end the session early.
pub fn main_loop<R: BufRead, W: Write>(
    store: &mut ClientStore,
    input: R,
    out: W,
) -> io::Result<()> {
    Session::new(store, input, out).run()
}

/// **One interactive session over a store**
///
/// Keeps the log of transactions made during the session.
pub struct Session<'s, R, W> {
    store: &'s mut ClientStore,
    input: R,
    out: W,
    tx_log: Vec<Tx>,
}

impl<'s, R: BufRead, W: Write> Session<'s, R, W> {
    pub fn new(store: &'s mut ClientStore, input: R, out: W) -> Self {
        Session {
            store,
            input,
            out,
            tx_log: Vec::new(),
        }
    }

    /// Transactions committed in this session, oldest first
    pub fn tx_log(&self) -> &[Tx] {
        &self.tx_log
    }

    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", help_contents())?;

        loop {
            let line = match read_labeled(&mut self.input, &mut self.out, PROMPT)? {
                Input::Line(line) => line,
                Input::Blank => continue,
                Input::Closed => break,
            };

            match Command::parse(&line) {
                Some(Command::Register) => self.register()?,
                Some(Command::Search) => self.search()?,
                Some(Command::List) => self.list()?,
                Some(Command::Deposit) => self.deposit()?,
                Some(Command::Withdraw) => self.withdraw()?,
                Some(Command::Transfer) => self.transfer()?,
                Some(Command::Ledger) => self.print_ledger()?,
                Some(Command::Help) => writeln!(self.out, "{}", help_contents())?,
                Some(Command::Quit) => break,
                None => writeln!(
                    self.out,
                    "Invalid choice. Please try again; `{HELP}` shows the menu."
                )?,
            }
        }

        Ok(())
    }

    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        prompt(&mut self.input, &mut self.out, label)
    }

    /// Asks for a document and classifies it; an invalid one is reported.
    fn ask_document(
        &mut self,
        operation: &str,
        label: &str,
    ) -> io::Result<Option<(String, ClientKind)>> {
        let Some(document) = self.ask(label)? else { return Ok(None) };

        match ClientKind::classify(&document) {
            Ok(kind) => Ok(Some((document, kind))),
            Err(err) => {
                self.report(operation, err)?;
                Ok(None)
            }
        }
    }

    /// Asks for an amount; one that isn't a number is reported.
    fn ask_amount(&mut self, operation: &str) -> io::Result<Option<Amount>> {
        let Some(word) = self.ask(AMOUNT_PROMPT)? else { return Ok(None) };

        match parse_amount(&word) {
            Some(amount) => Ok(Some(amount)),
            None => {
                self.report(operation, cannot_parse_number(&word))?;
                Ok(None)
            }
        }
    }

    /// Logs an operation's error and shows it to the user; the session continues.
    fn report(&mut self, operation: &str, err: impl Display) -> io::Result<()> {
        warn!("{} failed: {}", operation, err);
        writeln!(self.out, "[ERROR] {}", err)
    }

    /// Shows the balance after a successful operation, if it can be read back.
    fn print_balance(&mut self, kind: ClientKind, document: &str) -> io::Result<()> {
        match self.store.balance_of(kind, document) {
            Ok(balance) => writeln!(self.out, "Balance of {}: {:.2}", document, balance),
            Err(err) => self.report("balance lookup", err),
        }
    }

    /// **Registers a new client**
    ///
    /// The client type is chosen by the document's length.
    fn register(&mut self) -> io::Result<()> {
        let Some(document) = self.ask(DOCUMENT_PROMPT)? else { return Ok(()) };
        let Some(name) = self.ask(NAME_PROMPT)? else { return Ok(()) };
        let Some(email) = self.ask(EMAIL_PROMPT)? else { return Ok(()) };

        match self.store.register(&document, &name, &email) {
            Ok(client) => writeln!(
                self.out,
                "\nClient registered successfully as {}.",
                client.kind.token().to_uppercase()
            ),
            Err(RegistryError::DuplicateClient(_)) => writeln!(self.out, "Client already exists."),
            Err(err) => self.report(REGISTER, err),
        }
    }

    /// **Searches a client by document**
    ///
    /// The client type is inferred from the document's length.
    fn search(&mut self) -> io::Result<()> {
        let Some((document, kind)) = self.ask_document(SEARCH, DOCUMENT_PROMPT)? else {
            return Ok(());
        };

        match self.store.find(kind, &document) {
            Ok(client) => writeln!(self.out, "Client found:\n{}", client),
            Err(RegistryError::NotFound { .. }) => writeln!(self.out, "Client not found."),
            Err(err) => self.report(SEARCH, err),
        }
    }

    /// **Lists all clients of one type**
    fn list(&mut self) -> io::Result<()> {
        let Some(token) = self.ask(KIND_PROMPT)? else { return Ok(()) };
        let kind = match token.parse::<ClientKind>() {
            Ok(kind) => kind,
            Err(err) => return self.report(LIST, err),
        };

        match self.store.list(kind) {
            Ok(clients) if clients.is_empty() => writeln!(self.out, "No clients found."),
            Ok(clients) => {
                writeln!(self.out, "\nList of {} clients:", kind.token().to_uppercase())?;
                for client in clients {
                    writeln!(self.out, "\nName: {}\nEmail: {}", client.name, client.email)?;
                }
                Ok(())
            }
            Err(err) => self.report(LIST, err),
        }
    }

    /// **Deposits funds to an account**
    ///
    /// The account needs to exist. A negative amount is accepted and debits the account.
    /// Records the transaction in the session ledger on success.
    fn deposit(&mut self) -> io::Result<()> {
        let Some((document, kind)) = self.ask_document(DEPOSIT, DOCUMENT_PROMPT)? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount(DEPOSIT)? else { return Ok(()) };

        match ledger::deposit(self.store, kind, &document, amount) {
            Ok(tx) => {
                writeln!(self.out, "Deposit successful.")?;
                self.tx_log.push(tx);
                self.print_balance(kind, &document)
            }
            Err(err) => self.report(DEPOSIT, err),
        }
    }

    /// **Withdraws funds from an account**
    ///
    /// The amount must be positive and not exceed the balance.
    /// Records the transaction in the session ledger on success.
    fn withdraw(&mut self) -> io::Result<()> {
        let Some((document, kind)) = self.ask_document(WITHDRAW, DOCUMENT_PROMPT)? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount(WITHDRAW)? else { return Ok(()) };

        match ledger::withdraw(self.store, kind, &document, amount) {
            Ok(tx) => {
                writeln!(self.out, "Withdrawal successful.")?;
                self.tx_log.push(tx);
                self.print_balance(kind, &document)
            }
            Err(err) => self.report(WITHDRAW, err),
        }
    }

    /// **Transfers funds from one account to another account**
    ///
    /// Either client may be an individual or an organization.
    /// Nothing changes unless both sides succeed.
    /// Records both transactions in the session ledger on success.
    fn transfer(&mut self) -> io::Result<()> {
        let Some((sender, from_kind)) = self.ask_document(TRANSFER, SENDER_PROMPT)? else {
            return Ok(());
        };
        let Some((recipient, to_kind)) = self.ask_document(TRANSFER, RECIPIENT_PROMPT)? else {
            return Ok(());
        };
        let Some(amount) = self.ask_amount(TRANSFER)? else { return Ok(()) };

        match ledger::transfer(self.store, from_kind, &sender, to_kind, &recipient, amount) {
            Ok((withdrawal, deposit)) => {
                writeln!(self.out, "Transfer successful.")?;
                self.tx_log.push(withdrawal);
                self.tx_log.push(deposit);
                self.print_balance(from_kind, &sender)?;
                self.print_balance(to_kind, &recipient)
            }
            Err(err) => self.report(TRANSFER, err),
        }
    }

    /// **Prints all transactions made in this session**
    fn print_ledger(&mut self) -> io::Result<()> {
        if self.tx_log.is_empty() {
            return writeln!(self.out, "No transactions in this session.");
        }

        writeln!(self.out, "Session ledger:")?;
        for (i, tx) in self.tx_log.iter().enumerate() {
            writeln!(self.out, "{:>4}. {}", i + 1, tx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "12345678901";

    /// Runs `script` as typed input against `store` and returns everything written.
    fn run_script(store: &mut ClientStore, script: &str) -> String {
        let mut out = Vec::new();
        main_loop(store, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn store_with_alice() -> ClientStore {
        let mut store = ClientStore::in_memory().unwrap();
        store.register(ALICE, "Alice", "a@x.com").unwrap();
        store
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Some(Command::Register), Command::parse("1"));
        assert_eq!(Some(Command::Search), Command::parse("2"));
        assert_eq!(Some(Command::List), Command::parse("3"));
        assert_eq!(Some(Command::Deposit), Command::parse("4"));
        assert_eq!(Some(Command::Withdraw), Command::parse("5"));
        assert_eq!(Some(Command::Transfer), Command::parse("6"));
        assert_eq!(Some(Command::Ledger), Command::parse("7"));
        assert_eq!(Some(Command::Help), Command::parse("8"));
        assert_eq!(Some(Command::Quit), Command::parse("0"));
    }

    #[test]
    fn test_parse_names_and_short_forms() {
        assert_eq!(Some(Command::Transfer), Command::parse("Transfer"));
        assert_eq!(Some(Command::Withdraw), Command::parse(" w "));
        assert_eq!(Some(Command::Quit), Command::parse("exit"));
        assert_eq!(Some(Command::Quit), Command::parse("q"));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(None, Command::parse("9"));
        assert_eq!(None, Command::parse("send"));
        assert_eq!(None, Command::parse(""));
    }

    #[test]
    fn session_register_then_duplicate() {
        let mut store = ClientStore::in_memory().unwrap();

        let output = run_script(
            &mut store,
            "1\n12345678901\nAlice\na@x.com\n1\n12345678901\nMallory\nm@x.com\nq\n",
        );

        assert!(output.contains("Client registered successfully as PF."));
        assert!(output.contains("Client already exists."));
        assert_eq!("Alice", store.find(ClientKind::Individual, ALICE).unwrap().name);
    }

    #[test]
    fn session_search() {
        let mut store = store_with_alice();

        let output = run_script(&mut store, "s\n12345678901\ns\n10987654321\nq\n");

        assert!(output.contains("Client found:\nDocument: 12345678901\nName: Alice\nEmail: a@x.com"));
        assert!(output.contains("Client not found."));
    }

    #[test]
    fn session_search_rejects_bad_document() {
        let mut store = store_with_alice();

        let output = run_script(&mut store, "2\n12345\nq\n");

        assert!(output.contains("[ERROR] document has 5 characters"));
        assert!(!output.contains("Client not found."));
    }

    #[test]
    fn session_list() {
        let mut store = store_with_alice();

        let output = run_script(&mut store, "3\npf\n3\npj\n3\npx\nq\n");

        assert!(output.contains("List of PF clients:\n\nName: Alice\nEmail: a@x.com"));
        assert!(output.contains("No clients found."));
        assert!(output.contains("[ERROR] unknown client type \"px\""));
    }

    #[test]
    fn session_deposit_and_withdraw() {
        let mut store = store_with_alice();

        let output = run_script(
            &mut store,
            "4\n12345678901\n100\n5\n12345678901\n40\n5\n12345678901\n1000\n5\n12345678901\nlots\nq\n",
        );

        assert!(output.contains("Deposit successful."));
        assert!(output.contains("Balance of 12345678901: 100.00"));
        assert!(output.contains("Withdrawal successful."));
        assert!(output.contains("Balance of 12345678901: 60.00"));
        assert!(output.contains("[ERROR] client 12345678901 has balance 60.00, cannot withdraw 1000.00"));
        assert!(output.contains("you provided 'lots'."));
        assert_eq!(60.0, store.balance_of(ClientKind::Individual, ALICE).unwrap());
    }

    #[test]
    fn session_transfer_to_missing_recipient() {
        let mut store = store_with_alice();
        ledger::deposit(&mut store, ClientKind::Individual, ALICE, 100.0).unwrap();

        let output = run_script(&mut store, "t\n12345678901\n99999999000001\n50\ng\nq\n");

        assert!(output.contains("[ERROR] no organization client with document 99999999000001"));
        assert!(output.contains("No transactions in this session."));
        assert_eq!(100.0, store.balance_of(ClientKind::Individual, ALICE).unwrap());
    }

    #[test]
    fn session_ledger_records_transfers() {
        let mut store = store_with_alice();
        store.register("12345678000199", "Acme", "c@acme.com").unwrap();
        ledger::deposit(&mut store, ClientKind::Individual, ALICE, 100.0).unwrap();

        let mut out = Vec::new();
        let mut session = Session::new(
            &mut store,
            "6\n12345678901\n12345678000199\n30\n7\n".as_bytes(),
            &mut out,
        );
        session.run().unwrap();

        assert_eq!(2, session.tx_log().len());
        assert!(matches!(session.tx_log()[0], Tx::Withdraw { .. }));
        assert!(matches!(
            session.tx_log()[1],
            Tx::Deposit { kind: ClientKind::Organization, .. }
        ));
        drop(session);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Transfer successful."));
        assert!(output.contains("   1. withdraw pf 12345678901 30.00"));
        assert!(output.contains("   2. deposit  pj 12345678000199 30.00"));
    }

    #[test]
    fn session_invalid_choice_and_end_of_input() {
        let mut store = ClientStore::in_memory().unwrap();

        // No quit command: closed input ends the session.
        let output = run_script(&mut store, "9\n\nhelp\n");

        assert!(output.contains("Invalid choice. Please try again"));
        assert_eq!(2, output.matches("Menu:").count());
    }
}
