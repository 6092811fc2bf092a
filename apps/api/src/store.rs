//! The in-memory session store.
//!
//! [`Session`] is the single shared application state (one user, one
//! process, no persistence); its methods are plain synchronous reducers.
//! [`Store`] wraps it in `Arc<RwLock>` and owns every impure concern:
//! locking, notification toast expiry, and the wizard settlement timers.
//! Withdrawal settlement performs its debit and ledger append inside one
//! lock scope, so no partial state is ever observable.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::advice::{AssistantRole, AssistantThread};
use crate::applications::{self, Application, ApplicationStatus};
use crate::chat::attachments::{AttachmentStore, StoredAttachment};
use crate::chat::{self, Attachment, ChatSession, Message, Reaction};
use crate::errors::AppError;
use crate::models::job::{seed_jobs, Job};
use crate::models::user::{seed_talent, seed_user, UserProfile};
use crate::money::{format_rands, Cents};
use crate::notifications::{AppNotification, Inbox, NotificationKind, TOAST_TTL};
use crate::wallet::deposit::{self, DepositWizard, DepositWizardView};
use crate::wallet::withdraw::{self, WithdrawWizard, WithdrawWizardView};
use crate::wallet::{seed_transactions, Transaction, TransactionKind, TransactionStatus};

/// Everything the client session owns. Torn down only by reset.
pub struct Session {
    pub user: UserProfile,
    pub jobs: Vec<Job>,
    pub talent: Vec<UserProfile>,
    pub chats: Vec<ChatSession>,
    pub applications: Vec<Application>,
    pub transactions: Vec<Transaction>,
    pub inbox: Inbox,
    pub attachments: AttachmentStore,
    pub deposits: HashMap<Uuid, DepositWizard>,
    pub withdraws: HashMap<Uuid, WithdrawWizard>,
    pub assistant: AssistantThread,
}

impl Session {
    pub fn seeded() -> Self {
        let user = seed_user();
        let assistant = AssistantThread::greet(&user);
        Session {
            user,
            jobs: seed_jobs(),
            talent: seed_talent(),
            chats: vec![],
            applications: vec![],
            transactions: seed_transactions(),
            inbox: Inbox::default(),
            attachments: AttachmentStore::default(),
            deposits: HashMap::new(),
            withdraws: HashMap::new(),
            assistant,
        }
    }

    /// Lazily opens a chat with `participant_id`: an existing session is
    /// returned as-is (the caller just focuses it), otherwise a new one is
    /// prepended. At most one session per participant.
    pub fn start_or_open_chat(
        &mut self,
        participant_id: &str,
    ) -> Result<(ChatSession, bool), AppError> {
        if let Some(existing) = self.chats.iter().find(|c| c.participant_id == participant_id) {
            return Ok((existing.clone(), false));
        }
        let participant = self
            .talent
            .iter()
            .find(|t| t.id == participant_id)
            .ok_or_else(|| AppError::NotFound(format!("Contact {participant_id} not found")))?;
        let session = ChatSession::open(participant);
        self.chats.insert(0, session.clone());
        Ok((session, true))
    }

    fn chat_mut(&mut self, session_id: Uuid) -> Result<&mut ChatSession, AppError> {
        self.chats
            .iter_mut()
            .find(|c| c.id == session_id)
            .ok_or_else(|| AppError::NotFound(format!("Chat {session_id} not found")))
    }
}

/// Cloneable handle over the shared session.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Session>>,
}

impl Store {
    pub fn new(session: Session) -> Self {
        Store {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(Session::seeded())
    }

    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.inner.read().expect("session state poisoned"))
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.write().expect("session state poisoned"))
    }

    /// Tears the session down to its seeded state: pending settlement timers
    /// are aborted and attachment blobs released.
    pub fn reset(&self) {
        self.write(|s| {
            for wizard in s.deposits.values() {
                if let Some(handle) = &wizard.settlement {
                    handle.abort();
                }
            }
            for wizard in s.withdraws.values() {
                if let Some(handle) = &wizard.settlement {
                    handle.abort();
                }
            }
            s.attachments.release_all();
            *s = Session::seeded();
        });
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Creates a notification in both projections and schedules the toast
    /// away after [`TOAST_TTL`]. The durable inbox entry is never touched.
    pub fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> AppNotification {
        let notification = self.write(|s| s.inbox.push(kind, title, message));
        let store = self.clone();
        let id = notification.id;
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            store.write(|s| s.inbox.remove_toast(id));
        });
        notification
    }

    pub fn mark_all_read(&self) {
        self.write(|s| s.inbox.mark_all_read());
    }

    // ── Chat ────────────────────────────────────────────────────────────

    pub fn start_or_open_chat(&self, participant_id: &str) -> Result<(ChatSession, bool), AppError> {
        self.write(|s| s.start_or_open_chat(participant_id))
    }

    pub fn send_message(
        &self,
        session_id: Uuid,
        text: &str,
    ) -> Result<Option<Message>, AppError> {
        self.write(|s| {
            let sender = s.user.id.clone();
            Ok(s.chat_mut(session_id)?.push_text(&sender, text))
        })
    }

    /// Validates and stores an uploaded file, then appends the attachment
    /// message. Rejections emit a warning toast and leave no partial state.
    pub fn attach_file(
        &self,
        session_id: Uuid,
        name: &str,
        mime: &str,
        bytes: Bytes,
    ) -> Result<Message, AppError> {
        if let Err(rejection) = chat::check_upload(name, mime, bytes.len()) {
            let message = rejection.message();
            self.notify(NotificationKind::Warning, rejection.title(), message.clone());
            return Err(AppError::Capability(message));
        }

        self.write(|s| {
            let index = s
                .chats
                .iter()
                .position(|c| c.id == session_id)
                .ok_or_else(|| AppError::NotFound(format!("Chat {session_id} not found")))?;
            let sender = s.user.id.clone();
            let (_, url) = s.attachments.insert(name, mime, bytes);
            let attachment = Attachment {
                name: name.to_string(),
                url,
                mime_type: mime.to_string(),
            };
            Ok(s.chats[index].push_attachment(&sender, attachment))
        })
    }

    pub fn toggle_reaction(
        &self,
        session_id: Uuid,
        message_id: Uuid,
        emoji: &str,
    ) -> Result<Vec<Reaction>, AppError> {
        self.write(|s| {
            Ok(s.chat_mut(session_id)?
                .toggle_reaction(message_id, emoji)?
                .to_vec())
        })
    }

    pub fn attachment(&self, id: Uuid) -> Option<StoredAttachment> {
        self.read(|s| s.attachments.get(id).cloned())
    }

    // ── Applications ────────────────────────────────────────────────────

    pub fn submit_application(
        &self,
        job_id: &str,
        applicant_name: &str,
        message: Option<String>,
        resume: Option<(String, String, Bytes)>,
    ) -> Result<Application, AppError> {
        if let Some((name, _, bytes)) = &resume {
            if bytes.len() > chat::MAX_ATTACHMENT_BYTES {
                let warning = format!("{name} exceeds 5MB limit.");
                self.notify(NotificationKind::Warning, "File too large", warning.clone());
                return Err(AppError::Capability(warning));
            }
        }
        if let Err(e) = applications::validate_submission(message.as_deref(), resume.is_some()) {
            self.notify(
                NotificationKind::Warning,
                "Incomplete",
                "Please add a cover message or attach your CV.",
            );
            return Err(e);
        }

        let application = self.write(|s| {
            let job = s
                .jobs
                .iter()
                .find(|j| j.id == job_id)
                .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
            let job_title = job.title.clone();
            let (resume_name, resume_url) = match resume {
                Some((name, mime, bytes)) => {
                    let (_, url) = s.attachments.insert(&name, &mime, bytes);
                    (Some(name), Some(url))
                }
                None => (None, None),
            };
            let application = Application {
                id: Uuid::new_v4(),
                job_id: job_id.to_string(),
                job_title,
                applicant_name: applicant_name.to_string(),
                message: message
                    .filter(|m| !m.trim().is_empty())
                    .map(|m| m.trim().to_string()),
                resume_name,
                resume_url,
                status: ApplicationStatus::Pending,
                created_at: Utc::now(),
            };
            s.applications.insert(0, application.clone());
            Ok::<_, AppError>(application)
        })?;

        self.notify(
            NotificationKind::Success,
            "Application sent",
            format!("Your application to {} is pending.", application.job_title),
        );
        Ok(application)
    }

    /// Removes an application regardless of status (accepted/rejected
    /// withdrawal is intentionally not blocked; see DESIGN.md).
    pub fn withdraw_application(&self, id: Uuid) -> Result<(), AppError> {
        let job_title = self.write(|s| {
            let index = s
                .applications
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
            Ok::<_, AppError>(s.applications.remove(index).job_title)
        })?;
        self.notify(
            NotificationKind::Info,
            "Application withdrawn",
            format!("Your application to {job_title} was withdrawn."),
        );
        Ok(())
    }

    // ── Deposit wizard ──────────────────────────────────────────────────

    pub fn begin_deposit(&self) -> DepositWizardView {
        self.write(|s| {
            let wizard = DepositWizard::begin();
            let view = wizard.view();
            s.deposits.insert(wizard.id, wizard);
            view
        })
    }

    pub fn deposit_amount(&self, id: Uuid, raw: &str) -> Result<DepositWizardView, AppError> {
        self.write(|s| {
            let wizard = s
                .deposits
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Deposit {id} not found")))?;
            wizard.enter_amount(raw)?;
            Ok(wizard.view())
        })
    }

    /// Confirms the EFT and schedules settlement. The timer's abort handle is
    /// kept on the wizard so dismissal cancels it.
    pub fn confirm_deposit(&self, id: Uuid) -> Result<DepositWizardView, AppError> {
        let (amount, reference) = self.write(|s| {
            let wizard = s
                .deposits
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Deposit {id} not found")))?;
            wizard.confirm_eft()
        })?;

        let store = self.clone();
        let settle_reference = reference.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(deposit::SETTLE_DELAY).await;
            store.settle_deposit(id, amount, settle_reference);
        })
        .abort_handle();

        self.write(|s| {
            if let Some(wizard) = s.deposits.get_mut(&id) {
                wizard.settlement = Some(handle);
            }
            s.deposits
                .get(&id)
                .map(DepositWizard::view)
                .ok_or_else(|| AppError::NotFound(format!("Deposit {id} not found")))
        })
    }

    pub fn dismiss_deposit(&self, id: Uuid) -> Result<(), AppError> {
        let wizard = self
            .write(|s| s.deposits.remove(&id))
            .ok_or_else(|| AppError::NotFound(format!("Deposit {id} not found")))?;
        wizard.dismiss();
        Ok(())
    }

    pub fn deposit_view(&self, id: Uuid) -> Result<DepositWizardView, AppError> {
        self.read(|s| {
            s.deposits
                .get(&id)
                .map(DepositWizard::view)
                .ok_or_else(|| AppError::NotFound(format!("Deposit {id} not found")))
        })
    }

    /// Settlement: logs the *pending* deposit. The wallet balance is never
    /// credited here; clearing funds is an external step.
    fn settle_deposit(&self, id: Uuid, amount: Cents, reference: String) {
        let logged = self.write(|s| {
            // dismissed between fire and lock: drop silently
            if s.deposits.remove(&id).is_none() {
                return None;
            }
            s.transactions.insert(
                0,
                Transaction::new(
                    TransactionKind::Deposit,
                    amount,
                    format!("EFT Deposit ({reference})"),
                    TransactionStatus::Pending,
                    Some(reference.clone()),
                ),
            );
            Some(format!(
                "Your EFT of {} is being processed. Ref: {reference}",
                format_rands(amount)
            ))
        });
        if let Some(message) = logged {
            info!("deposit {reference} logged as pending");
            self.notify(NotificationKind::Info, "Deposit Logged", message);
        }
    }

    // ── Withdraw wizard ─────────────────────────────────────────────────

    pub fn begin_withdraw(&self) -> WithdrawWizardView {
        self.write(|s| {
            let wizard = WithdrawWizard::begin();
            let view = wizard.view();
            s.withdraws.insert(wizard.id, wizard);
            view
        })
    }

    pub fn withdraw_amount(&self, id: Uuid, raw: &str) -> Result<WithdrawWizardView, AppError> {
        self.write(|s| {
            let balance = s.user.wallet_balance_cents;
            let wizard = s
                .withdraws
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))?;
            wizard.enter_amount(raw, balance)?;
            Ok(wizard.view())
        })
    }

    pub fn withdraw_bank(&self, id: Uuid, bank: &str) -> Result<WithdrawWizardView, AppError> {
        self.write(|s| {
            let wizard = s
                .withdraws
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))?;
            wizard.select_bank(bank)?;
            wizard.to_details()?;
            Ok(wizard.view())
        })
    }

    pub fn withdraw_back(&self, id: Uuid) -> Result<WithdrawWizardView, AppError> {
        self.write(|s| {
            let wizard = s
                .withdraws
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))?;
            wizard.back()?;
            Ok(wizard.view())
        })
    }

    pub fn confirm_withdraw(
        &self,
        id: Uuid,
        account_holder: &str,
        account_number: &str,
        account_type: Option<&str>,
    ) -> Result<WithdrawWizardView, AppError> {
        let (amount, bank) = self.write(|s| {
            let wizard = s
                .withdraws
                .get_mut(&id)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))?;
            wizard.confirm_details(account_holder, account_number, account_type)
        })?;

        let store = self.clone();
        let settle_bank = bank.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(withdraw::SETTLE_DELAY).await;
            store.settle_withdrawal(id, amount, settle_bank);
        })
        .abort_handle();

        self.write(|s| {
            if let Some(wizard) = s.withdraws.get_mut(&id) {
                wizard.settlement = Some(handle);
            }
            s.withdraws
                .get(&id)
                .map(WithdrawWizard::view)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))
        })
    }

    pub fn dismiss_withdraw(&self, id: Uuid) -> Result<(), AppError> {
        let wizard = self
            .write(|s| s.withdraws.remove(&id))
            .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))?;
        wizard.dismiss();
        Ok(())
    }

    pub fn withdraw_view(&self, id: Uuid) -> Result<WithdrawWizardView, AppError> {
        self.read(|s| {
            s.withdraws
                .get(&id)
                .map(WithdrawWizard::view)
                .ok_or_else(|| AppError::NotFound(format!("Withdrawal {id} not found")))
        })
    }

    /// Settlement: debit and ledger append happen in one lock scope. The
    /// balance is re-checked because another withdrawal may have settled
    /// while this one was processing; a failed re-check logs a failed entry.
    fn settle_withdrawal(&self, id: Uuid, amount: Cents, bank: String) {
        let outcome = self.write(|s| {
            if s.withdraws.remove(&id).is_none() {
                return None;
            }
            let description = format!("Withdrawal to {bank}");
            if amount > s.user.wallet_balance_cents {
                s.transactions.insert(
                    0,
                    Transaction::new(
                        TransactionKind::Withdrawal,
                        amount,
                        description,
                        TransactionStatus::Failed,
                        None,
                    ),
                );
                return Some(false);
            }
            s.user.wallet_balance_cents -= amount;
            s.transactions.insert(
                0,
                Transaction::new(
                    TransactionKind::Withdrawal,
                    amount,
                    description,
                    TransactionStatus::Completed,
                    None,
                ),
            );
            Some(true)
        });

        match outcome {
            Some(true) => {
                self.notify(
                    NotificationKind::Success,
                    "Withdrawal Successful!",
                    format!(
                        "{} has been sent to your {bank} account.",
                        format_rands(amount)
                    ),
                );
            }
            Some(false) => {
                self.notify(
                    NotificationKind::Warning,
                    "Withdrawal Failed",
                    "Insufficient funds.",
                );
            }
            None => {} // dismissed
        }
    }

    // ── Favorites / contacts ────────────────────────────────────────────

    pub fn toggle_favorite(&self, talent_id: &str) -> bool {
        let now_favorite = self.write(|s| {
            match s.user.favorites.iter().position(|f| f == talent_id) {
                Some(i) => {
                    s.user.favorites.remove(i);
                    false
                }
                None => {
                    s.user.favorites.push(talent_id.to_string());
                    true
                }
            }
        });
        if now_favorite {
            self.notify(NotificationKind::Info, "Added to Favorites", "Profile saved.");
        } else {
            self.notify(NotificationKind::Info, "Removed Bookmark", "Removed from list.");
        }
        now_favorite
    }

    pub fn toggle_contact(&self, talent_id: &str) -> bool {
        let (now_contact, name) = self.write(|s| {
            // missing talent ids are tolerated; fall back to the raw id
            let name = s
                .talent
                .iter()
                .find(|t| t.id == talent_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| talent_id.to_string());
            let now = match s.user.contacts.iter().position(|c| c == talent_id) {
                Some(i) => {
                    s.user.contacts.remove(i);
                    false
                }
                None => {
                    s.user.contacts.push(talent_id.to_string());
                    true
                }
            };
            (now, name)
        });
        if now_contact {
            self.notify(
                NotificationKind::Success,
                "Added to Contacts",
                format!("{name} added to your book."),
            );
        } else {
            self.notify(
                NotificationKind::Success,
                "Removed Contact",
                format!("{name} removed."),
            );
        }
        now_contact
    }

    // ── Assistant composer gate ─────────────────────────────────────────

    /// Records the outgoing message and takes the busy flag; rejected while a
    /// previous send is still in flight (concurrency 1 per composer).
    pub fn begin_assistant_send(&self, text: &str) -> Result<(UserProfile, String), AppError> {
        let query = text.trim().to_string();
        if query.is_empty() {
            return Err(AppError::Validation("Message is empty.".to_string()));
        }
        self.write(|s| {
            if s.assistant.loading {
                return Err(AppError::Busy("The coach is still thinking.".to_string()));
            }
            s.assistant.loading = true;
            s.assistant.push(AssistantRole::User, query.clone());
            Ok((s.user.clone(), query))
        })
    }

    pub fn finish_assistant_send(&self, reply: String) {
        self.write(|s| {
            s.assistant.push(AssistantRole::Ai, reply);
            s.assistant.loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Lets spawned settlement/expiry tasks run on the paused test runtime.
    async fn drain_tasks() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_but_inbox_entry_persists() {
        let store = Store::seeded();
        store.notify(NotificationKind::Info, "Deposit Logged", "Processing.");
        // let the expiry task start its sleep before moving the clock
        drain_tasks().await;

        tokio::time::advance(Duration::from_millis(1000)).await;
        drain_tasks().await;
        assert_eq!(store.read(|s| s.inbox.active_toasts().len()), 1);

        tokio::time::advance(Duration::from_millis(3100)).await;
        drain_tasks().await;
        assert_eq!(store.read(|s| s.inbox.active_toasts().len()), 0);
        assert_eq!(store.read(|s| s.inbox.items().len()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deposit_settles_pending_without_crediting_balance() {
        let store = Store::seeded();
        let before = store.read(|s| s.user.wallet_balance_cents);

        let wizard = store.begin_deposit();
        store.deposit_amount(wizard.id, "250").unwrap();
        store.confirm_deposit(wizard.id).unwrap();
        drain_tasks().await;

        tokio::time::advance(deposit::SETTLE_DELAY).await;
        drain_tasks().await;

        store.read(|s| {
            let tx = &s.transactions[0];
            assert_eq!(tx.kind, TransactionKind::Deposit);
            assert_eq!(tx.status, TransactionStatus::Pending);
            assert_eq!(tx.amount_cents, 25_000);
            assert_eq!(tx.reference.as_deref(), Some(wizard.reference.as_str()));
            assert_eq!(s.user.wallet_balance_cents, before);
            assert!(s.deposits.is_empty());
            assert_eq!(s.inbox.items()[0].title, "Deposit Logged");
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissed_deposit_never_mutates_session() {
        let store = Store::seeded();
        let ledger_before = store.read(|s| s.transactions.len());

        let wizard = store.begin_deposit();
        store.deposit_amount(wizard.id, "100").unwrap();
        store.confirm_deposit(wizard.id).unwrap();
        store.dismiss_deposit(wizard.id).unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        drain_tasks().await;

        store.read(|s| {
            assert_eq!(s.transactions.len(), ledger_before);
            assert!(s.inbox.items().is_empty());
            assert!(s.deposits.is_empty());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_withdrawal_debits_exactly_once() {
        let store = Store::seeded();
        let before = store.read(|s| s.user.wallet_balance_cents);

        let wizard = store.begin_withdraw();
        store.withdraw_amount(wizard.id, "500").unwrap();
        store.withdraw_bank(wizard.id, "Nedbank").unwrap();
        store
            .confirm_withdraw(wizard.id, "Z Dlamini", "6284920", None)
            .unwrap();
        drain_tasks().await;

        // mid-processing: nothing applied yet
        tokio::time::advance(Duration::from_millis(1000)).await;
        drain_tasks().await;
        assert_eq!(store.read(|s| s.user.wallet_balance_cents), before);

        tokio::time::advance(Duration::from_millis(2000)).await;
        drain_tasks().await;

        store.read(|s| {
            assert_eq!(s.user.wallet_balance_cents, before - 50_000);
            let tx = &s.transactions[0];
            assert_eq!(tx.kind, TransactionKind::Withdrawal);
            assert_eq!(tx.status, TransactionStatus::Completed);
            assert_eq!(tx.description, "Withdrawal to Nedbank");
            assert!(s.withdraws.is_empty());
            assert_eq!(s.inbox.items()[0].title, "Withdrawal Successful!");
        });

        // a long wait changes nothing further
        tokio::time::advance(Duration::from_secs(30)).await;
        drain_tasks().await;
        assert_eq!(store.read(|s| s.user.wallet_balance_cents), before - 50_000);
    }

    #[tokio::test]
    async fn test_chat_creation_is_idempotent_per_participant() {
        let store = Store::seeded();
        let (first, created) = store.start_or_open_chat("t1").unwrap();
        assert!(created);
        let (second, created) = store.start_or_open_chat("t1").unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(store.read(|s| s.chats.len()), 1);
    }

    #[tokio::test]
    async fn test_attach_rejects_oversized_file_without_partial_state() {
        let store = Store::seeded();
        let (session, _) = store.start_or_open_chat("t1").unwrap();

        let big = Bytes::from(vec![0u8; 6 * 1024 * 1024]);
        let err = store
            .attach_file(session.id, "huge.pdf", "application/pdf", big)
            .unwrap_err();
        assert!(matches!(err, AppError::Capability(_)));

        store.read(|s| {
            assert_eq!(s.chats[0].messages.len(), 1); // welcome only
            assert!(s.attachments.is_empty());
            assert_eq!(s.inbox.items()[0].title, "File too large");
        });
    }

    #[tokio::test]
    async fn test_attach_accepts_pdf_and_updates_last_message() {
        let store = Store::seeded();
        let (session, _) = store.start_or_open_chat("t1").unwrap();

        let pdf = Bytes::from(vec![0u8; 4 * 1024 * 1024]);
        let message = store
            .attach_file(session.id, "cv.pdf", "application/pdf", pdf)
            .unwrap();

        assert!(matches!(message.body, chat::MessageBody::Attachment { .. }));
        store.read(|s| {
            assert_eq!(s.chats[0].last_message, "Sent file: cv.pdf");
            assert_eq!(s.attachments.len(), 1);
        });
    }

    #[tokio::test]
    async fn test_application_requires_message_or_resume() {
        let store = Store::seeded();
        let err = store
            .submit_application("1", "Zanele Dlamini", None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        store.read(|s| {
            assert!(s.applications.is_empty());
            assert_eq!(s.inbox.items()[0].title, "Incomplete");
        });

        let app = store
            .submit_application("1", "Zanele Dlamini", Some("Keen to help.".to_string()), None)
            .unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        store.read(|s| assert_eq!(s.applications.len(), 1));
    }

    #[tokio::test]
    async fn test_withdraw_application_any_status() {
        let store = Store::seeded();
        let app = store
            .submit_application("2", "Zanele Dlamini", Some("Hi".to_string()), None)
            .unwrap();
        store.write(|s| s.applications[0].status = ApplicationStatus::Accepted);

        store.withdraw_application(app.id).unwrap();
        store.read(|s| {
            assert!(s.applications.is_empty());
            assert_eq!(s.inbox.items()[0].title, "Application withdrawn");
        });
    }

    #[tokio::test]
    async fn test_assistant_busy_gate() {
        let store = Store::seeded();
        let (_, query) = store.begin_assistant_send("How do I upskill?").unwrap();
        assert_eq!(query, "How do I upskill?");

        let err = store.begin_assistant_send("Another question").unwrap_err();
        assert!(matches!(err, AppError::Busy(_)));

        store.finish_assistant_send("Try a short course.".to_string());
        assert!(store.begin_assistant_send("Thanks, what else?").is_ok());
    }

    #[tokio::test]
    async fn test_reset_releases_attachments() {
        let store = Store::seeded();
        let (session, _) = store.start_or_open_chat("t2").unwrap();
        store
            .attach_file(session.id, "a.txt", "text/plain", Bytes::from_static(b"a"))
            .unwrap();
        assert_eq!(store.read(|s| s.attachments.len()), 1);

        store.reset();
        store.read(|s| {
            assert!(s.attachments.is_empty());
            assert!(s.chats.is_empty());
        });
    }
}
