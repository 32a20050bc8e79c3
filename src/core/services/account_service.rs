use std::{io::Write, sync::Arc};

use tracing::info;
use uuid::Uuid;

use crate::domain::account::{Account, AccountDraft, DisplayCurrency};
use crate::domain::common::{match_id, parse_amount};
use crate::errors::LedgerError;
use crate::storage::{keys, load_collection, save_value, KeyValueStore};

use super::{ServiceError, ServiceResult};

pub const CSV_HEADER: [&str; 5] = ["name", "balance", "credit_limit", "icon", "currency"];

pub struct AccountService {
    store: Arc<dyn KeyValueStore>,
    accounts: Vec<Account>,
}

impl AccountService {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let accounts = load_collection(store.as_ref(), keys::ACCOUNTS);
        Self { store, accounts }
    }

    pub fn list(&self) -> &[Account] {
        &self.accounts
    }

    pub fn find_id(&self, needle: &str) -> Option<Uuid> {
        match_id(&self.accounts, needle)
    }

    pub fn get(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn add(&mut self, draft: AccountDraft) -> ServiceResult<&Account> {
        let mut account = Self::validate(draft)?;
        account.id = Uuid::new_v4();
        info!(id = %account.id, name = %account.name, "account added");
        self.accounts.push(account);
        self.persist();
        let last = self.accounts.len() - 1;
        Ok(&self.accounts[last])
    }

    pub fn edit(&mut self, id: Uuid, draft: AccountDraft) -> ServiceResult<&Account> {
        let changes = Self::validate(draft)?;
        let position = self
            .accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("account {id}")))?;
        self.accounts[position] = Account { id, ..changes };
        info!(%id, "account updated");
        self.persist();
        Ok(&self.accounts[position])
    }

    pub fn remove(&mut self, id: Uuid) -> ServiceResult<Account> {
        let position = self
            .accounts
            .iter()
            .position(|account| account.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("account {id}")))?;
        let removed = self.accounts.remove(position);
        info!(%id, "account removed");
        self.persist();
        Ok(removed)
    }

    /// Accounts ordered by balance, largest first. Ties keep insertion order.
    pub fn sorted_by_balance(&self) -> Vec<&Account> {
        let mut sorted: Vec<&Account> = self.accounts.iter().collect();
        sorted.sort_by(|a, b| b.balance.total_cmp(&a.balance));
        sorted
    }

    /// Sum of balances converted with the illustrative rate of `currency`.
    pub fn total_in(&self, currency: DisplayCurrency) -> f64 {
        self.accounts
            .iter()
            .map(|account| currency.convert(account.balance))
            .sum()
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, LedgerError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for account in &self.accounts {
            csv.write_record([
                account.name.clone(),
                account.balance.to_string(),
                account
                    .credit_limit
                    .map(|limit| limit.to_string())
                    .unwrap_or_default(),
                account.icon.to_string(),
                account.currency.clone(),
            ])?;
        }
        csv.flush()?;
        Ok(self.accounts.len())
    }

    fn validate(draft: AccountDraft) -> ServiceResult<Account> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("name and balance are required".into()));
        }
        let balance = parse_amount(&draft.balance).ok_or_else(|| {
            ServiceError::Invalid("name and balance are required".into())
        })?;
        let credit_limit = if draft.credit_limit.trim().is_empty() {
            None
        } else {
            Some(parse_amount(&draft.credit_limit).ok_or_else(|| {
                LedgerError::Validation(format!("`{}` is not a number", draft.credit_limit))
            })?)
        };
        let currency = match draft.currency.as_deref() {
            Some(symbol) => DisplayCurrency::find(symbol)
                .ok_or_else(|| LedgerError::Validation(format!("unknown currency `{symbol}`")))?,
            None => DisplayCurrency::default(),
        };
        let mut account = Account::new(name, balance);
        account.credit_limit = credit_limit;
        account.icon = draft.icon;
        account.currency = currency.symbol.to_string();
        Ok(account)
    }

    fn persist(&self) -> bool {
        save_value(self.store.as_ref(), keys::ACCOUNTS, &self.accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountIcon;
    use crate::storage::MemoryStore;

    fn draft(name: &str, balance: &str) -> AccountDraft {
        AccountDraft {
            name: name.into(),
            balance: balance.into(),
            ..AccountDraft::default()
        }
    }

    #[test]
    fn add_validates_name_and_balance() {
        let mut service = AccountService::load(Arc::new(MemoryStore::new()));
        assert!(service.add(draft("", "10")).is_err());
        assert!(service.add(draft("Wallet", "")).is_err());
        assert!(service.add(draft("Wallet", "ten")).is_err());
        let mut with_limit = draft("Card", "-200");
        with_limit.credit_limit = "5000".into();
        with_limit.icon = AccountIcon::CreditCard;
        let account = service.add(with_limit).unwrap();
        assert_eq!(account.credit_limit, Some(5000.0));
        assert_eq!(account.currency, "NT$");
    }

    #[test]
    fn sorting_and_totals() {
        let mut service = AccountService::load(Arc::new(MemoryStore::new()));
        service.add(draft("Low", "100")).unwrap();
        service.add(draft("High", "900")).unwrap();
        let names: Vec<&str> = service
            .sorted_by_balance()
            .iter()
            .map(|account| account.name.as_str())
            .collect();
        assert_eq!(names, ["High", "Low"]);
        assert_eq!(service.total_in(DisplayCurrency::default()), 1000.0);
        let jpy = DisplayCurrency::find("JPY¥").unwrap();
        assert!((service.total_in(jpy) - 3650.0).abs() < 1e-9);
    }

    #[test]
    fn edit_keeps_id_and_remove_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut service = AccountService::load(store.clone());
        let id = service.add(draft("Bank", "10")).unwrap().id;
        let edited = service.edit(id, draft("Main bank", "25")).unwrap();
        assert_eq!(edited.id, id);
        assert_eq!(edited.balance, 25.0);
        assert_eq!(AccountService::load(store.clone()).list()[0].name, "Main bank");
        service.remove(id).unwrap();
        assert!(AccountService::load(store).list().is_empty());
    }

    #[test]
    fn export_writes_header_and_rows() {
        let mut service = AccountService::load(Arc::new(MemoryStore::new()));
        service.add(draft("Wallet", "12.5")).unwrap();
        let mut buffer = Vec::new();
        assert_eq!(service.export_csv(&mut buffer).unwrap(), 1);
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,balance,credit_limit,icon,currency"));
        assert_eq!(lines.next(), Some("Wallet,12.5,,cash,NT$"));
    }
}
