/// Source apps whose notifications are worth parsing, with the
/// human-readable bank label attached to extracted transactions.
pub const TARGET_SOURCES: &[(&str, &str)] = &[
    ("com.kakaobank.channel", "카카오뱅크"),
    ("com.shinhan.sbanking", "신한은행"),
    ("viva.republica.toss", "토스"),
    ("com.kakao.talk", "카카오톡"),
    ("com.samsung.android.messaging", "삼성메시지"),
];

pub fn bank_label(source: &str) -> Option<&'static str> {
    TARGET_SOURCES
        .iter()
        .find(|(pkg, _)| *pkg == source)
        .map(|(_, label)| *label)
}

/// One inbound notification, consumed once by the ingest path.
/// Never persisted; the durable record keeps only the combined text.
#[derive(Debug, Clone)]
pub struct NotificationEvent {
    pub source_label: String,
    pub combined_text: String,
}

/// The text fields a notification may carry. Messaging apps often put the
/// real content in the latest conversation message while the short text
/// only says "N개의 메시지", so field priority matters.
#[derive(Debug, Clone, Default)]
pub struct NotificationText {
    pub title: String,
    pub latest_message: Option<String>,
    pub big_text: Option<String>,
    pub text: Option<String>,
    pub text_lines: Vec<String>,
}

impl NotificationText {
    /// Best-available body: latest message, else expanded text, else short
    /// text, else digest lines joined with single spaces.
    fn body(&self) -> Option<String> {
        if let Some(msg) = non_blank(self.latest_message.as_deref()) {
            return Some(msg);
        }
        if let Some(big) = non_blank(self.big_text.as_deref()) {
            return Some(big);
        }
        if let Some(short) = non_blank(self.text.as_deref()) {
            return Some(short);
        }
        let joined = self.text_lines.join(" ");
        non_blank(Some(joined.as_str()))
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

/// Assemble an event from a notification's text fields. `None` when no
/// body text could be found (nothing to parse).
pub fn assemble(source_label: &str, text: &NotificationText) -> Option<NotificationEvent> {
    let body = text.body()?;
    let combined_text = if text.title.trim().is_empty() {
        body
    } else {
        format!("{} {}", text.title, body)
    };
    Some(NotificationEvent {
        source_label: source_label.to_string(),
        combined_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_label_mapping() {
        assert_eq!(bank_label("com.shinhan.sbanking"), Some("신한은행"));
        assert_eq!(bank_label("viva.republica.toss"), Some("토스"));
        assert_eq!(bank_label("com.example.game"), None);
    }

    #[test]
    fn test_big_text_preferred_over_short_text() {
        let text = NotificationText {
            title: "신한은행".to_string(),
            big_text: Some("신한카드 15,000원 승인 스타벅스강남점".to_string()),
            text: Some("새 알림 1건".to_string()),
            ..Default::default()
        };
        let event = assemble("com.shinhan.sbanking", &text).unwrap();
        assert_eq!(event.combined_text, "신한은행 신한카드 15,000원 승인 스타벅스강남점");
    }

    #[test]
    fn test_latest_message_preferred_over_everything() {
        let text = NotificationText {
            title: "카카오톡".to_string(),
            latest_message: Some("토스뱅크 30,000원 입금".to_string()),
            text: Some("3개의 메시지".to_string()),
            ..Default::default()
        };
        let event = assemble("com.kakao.talk", &text).unwrap();
        assert_eq!(event.combined_text, "카카오톡 토스뱅크 30,000원 입금");
    }

    #[test]
    fn test_digest_lines_joined_with_spaces() {
        let text = NotificationText {
            title: "삼성메시지".to_string(),
            text_lines: vec!["하나카드 5,000원".to_string(), "승인 파리바게뜨".to_string()],
            ..Default::default()
        };
        let event = assemble("com.samsung.android.messaging", &text).unwrap();
        assert_eq!(event.combined_text, "삼성메시지 하나카드 5,000원 승인 파리바게뜨");
    }

    #[test]
    fn test_blank_body_yields_no_event() {
        let text = NotificationText {
            title: "신한은행".to_string(),
            text: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(assemble("com.shinhan.sbanking", &text).is_none());
    }

    #[test]
    fn test_blank_title_omitted() {
        let text = NotificationText {
            text: Some("토스뱅크 30,000원 입금".to_string()),
            ..Default::default()
        };
        let event = assemble("viva.republica.toss", &text).unwrap();
        assert_eq!(event.combined_text, "토스뱅크 30,000원 입금");
    }
}
