use std::sync::Arc;

use crate::error::{FintrackError, Result};
use crate::event::{assemble, NotificationText};
use crate::ingestor::Ingestor;
use crate::remote::HttpRemoteClient;
use crate::repository::{BacklogPolicy, TransactionRepository};
use crate::settings::{db_path, load_settings};
use crate::store::TransactionStore;

struct DemoNotification {
    source: &'static str,
    title: &'static str,
    text: &'static str,
}

const NOTIFICATIONS: &[DemoNotification] = &[
    DemoNotification {
        source: "com.shinhan.sbanking",
        title: "신한은행",
        text: "신한카드(1234) 김*수님 15,000원 승인 02/15 13:00 스타벅스강남점",
    },
    DemoNotification {
        source: "com.samsung.android.messaging",
        title: "Web발신",
        text: "KB국민카드 승인 홍길동 4,500원 02/15 12:30 CU편의점",
    },
    DemoNotification {
        source: "viva.republica.toss",
        title: "토스",
        text: "토스뱅크 30,000원 입금 (김토스)",
    },
    DemoNotification {
        source: "com.kakao.talk",
        title: "카카오톡",
        text: "택배가 도착했습니다",
    },
];

/// Feed sample notifications through the full ingest pipeline, then run
/// one sync pass. The unparseable one is dropped on purpose.
pub fn run() -> Result<()> {
    let settings = load_settings();
    let store = Arc::new(TransactionStore::open(&db_path())?);
    let client = HttpRemoteClient::new(&settings.api_base_url)
        .map_err(|e| FintrackError::Remote(e.to_string()))?;
    let repository = Arc::new(TransactionRepository::new(store, client));
    let ingestor = Ingestor::new(Arc::clone(&repository), &settings.user_id);

    let mut handles = Vec::new();
    for n in NOTIFICATIONS {
        let fields = NotificationText {
            title: n.title.to_string(),
            text: Some(n.text.to_string()),
            ..Default::default()
        };
        if let Some(event) = assemble(n.source, &fields) {
            handles.push(ingestor.dispatch(event));
        }
    }
    for handle in handles {
        let _ = handle.join();
    }

    if let Some(sync) = ingestor.sync_pending(BacklogPolicy::StopOnFirstFailure) {
        let _ = sync.join();
    }

    let total = repository.store().count()?;
    let pending = repository.store().count_unsynced()?;
    println!("Demo ingest complete: {total} transaction(s) stored, {pending} awaiting sync.");
    println!("Try `fintrack recent` and `fintrack status`.");
    Ok(())
}
