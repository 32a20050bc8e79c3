pub mod account;
pub mod category;
pub mod common;
pub mod group;
pub mod split;
pub mod transaction;

pub use account::{Account, AccountDraft, AccountIcon, DisplayCurrency, DISPLAY_CURRENCIES};
pub use category::CategoryBook;
pub use common::{Displayable, Identifiable};
pub use group::Group;
pub use split::{Member, MemberShare, SplitRecord};
pub use transaction::{TransactionDraft, TransactionKind, TransactionRecord};
