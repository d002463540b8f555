//! Bundled static records shown before, or alongside, collaborator data

use crate::types::{
    AccessLog, AccessType, Address, AdminResponse, Client, ClientStatus, Contact, Deal, DealStage,
    DeviceInfo, DeviceType, FeedbackUser, GeoLocation, Idea, IdeaCategory, IdeaStatus, LogLevel,
    LogStatus, NpsResponse, Plan, Priority, UserSummary,
};
use chrono::{DateTime, NaiveDate, Utc};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

fn day(iso: &str) -> NaiveDate {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn user(id: &str, name: &str, email: &str) -> Option<UserSummary> {
    Some(UserSummary {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

fn location(city: &str, country: &str, coordinates: &str) -> GeoLocation {
    GeoLocation {
        city: city.to_string(),
        country: country.to_string(),
        coordinates: coordinates.to_string(),
    }
}

fn device(device_type: DeviceType, browser: &str, os: &str, version: &str) -> DeviceInfo {
    DeviceInfo {
        device_type,
        browser: browser.to_string(),
        os: os.to_string(),
        version: version.to_string(),
    }
}

/// The eight sample access log entries, newest first
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn access_logs() -> Vec<AccessLog> {
    vec![
        AccessLog {
            id: "1".to_string(),
            timestamp: at("2024-12-24T10:30:45.123Z"),
            status: LogStatus::Success,
            level: LogLevel::Info,
            access_type: AccessType::Login,
            user: user("1", "Alex Chen", "alex@company.com"),
            resource: "/api/auth/login".to_string(),
            method: "POST".to_string(),
            status_code: 200,
            ip_address: "192.168.1.100".to_string(),
            location: location("San Francisco", "USA", "37.7749,-122.4194"),
            device: device(DeviceType::Desktop, "Chrome", "macOS", "120.0"),
            duration_ms: 145,
            request_size: 256,
            response_size: 1024,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            referrer: Some("https://app.company.com/login".to_string()),
            session_id: "sess_abc123".to_string(),
            request_id: "req_xyz789".to_string(),
            error_message: None,
            stack_trace: None,
            tags: strings(&["auth", "user-login"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "2".to_string(),
            timestamp: at("2024-12-24T10:28:30.456Z"),
            status: LogStatus::Failed,
            level: LogLevel::Warn,
            access_type: AccessType::Login,
            user: None,
            resource: "/api/auth/login".to_string(),
            method: "POST".to_string(),
            status_code: 401,
            ip_address: "203.45.67.89".to_string(),
            location: location("Unknown", "Russia", "55.7558,37.6173"),
            device: device(DeviceType::Desktop, "Firefox", "Windows", "119.0"),
            duration_ms: 89,
            request_size: 128,
            response_size: 64,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            referrer: None,
            session_id: "sess_def456".to_string(),
            request_id: "req_uvw123".to_string(),
            error_message: Some("Invalid credentials".to_string()),
            stack_trace: None,
            tags: strings(&["auth", "failed-login"]),
            is_suspicious: true,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "3".to_string(),
            timestamp: at("2024-12-24T10:25:15.789Z"),
            status: LogStatus::Success,
            level: LogLevel::Info,
            access_type: AccessType::Api,
            user: user("2", "Sarah Miller", "sarah@company.com"),
            resource: "/api/v2/users/profile".to_string(),
            method: "GET".to_string(),
            status_code: 200,
            ip_address: "10.0.0.55".to_string(),
            location: location("New York", "USA", "40.7128,-74.0060"),
            device: device(DeviceType::Mobile, "Safari", "iOS", "17.0"),
            duration_ms: 234,
            request_size: 64,
            response_size: 2048,
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)".to_string(),
            referrer: Some("https://app.company.com/dashboard".to_string()),
            session_id: "sess_ghi789".to_string(),
            request_id: "req_rst456".to_string(),
            error_message: None,
            stack_trace: None,
            tags: strings(&["api", "user-data"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "4".to_string(),
            timestamp: at("2024-12-24T10:22:00.012Z"),
            status: LogStatus::Blocked,
            level: LogLevel::Error,
            access_type: AccessType::Api,
            user: None,
            resource: "/api/admin/users".to_string(),
            method: "DELETE".to_string(),
            status_code: 403,
            ip_address: "45.67.89.123".to_string(),
            location: location("Beijing", "China", "39.9042,116.4074"),
            device: device(DeviceType::Bot, "Unknown", "Linux", ""),
            duration_ms: 12,
            request_size: 32,
            response_size: 48,
            user_agent: "Python-urllib/3.9".to_string(),
            referrer: None,
            session_id: String::new(),
            request_id: "req_opq789".to_string(),
            error_message: Some("Blocked by WAF: Suspicious activity".to_string()),
            stack_trace: None,
            tags: strings(&["security", "blocked", "bot"]),
            is_suspicious: true,
            is_bot: true,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "5".to_string(),
            timestamp: at("2024-12-24T10:18:45.345Z"),
            status: LogStatus::Success,
            level: LogLevel::Info,
            access_type: AccessType::Admin,
            user: user("3", "Mike Johnson", "mike@company.com"),
            resource: "/api/admin/settings".to_string(),
            method: "PUT".to_string(),
            status_code: 200,
            ip_address: "192.168.1.50".to_string(),
            location: location("Austin", "USA", "30.2672,-97.7431"),
            device: device(DeviceType::Desktop, "Chrome", "Windows", "120.0"),
            duration_ms: 567,
            request_size: 4096,
            response_size: 512,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            referrer: Some("https://app.company.com/admin/settings".to_string()),
            session_id: "sess_jkl012".to_string(),
            request_id: "req_mno345".to_string(),
            error_message: None,
            stack_trace: None,
            tags: strings(&["admin", "settings-update"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "6".to_string(),
            timestamp: at("2024-12-24T10:15:30.678Z"),
            status: LogStatus::Warning,
            level: LogLevel::Warn,
            access_type: AccessType::Database,
            user: user("4", "Emma Wilson", "emma@company.com"),
            resource: "/api/db/query".to_string(),
            method: "POST".to_string(),
            status_code: 200,
            ip_address: "10.0.0.88".to_string(),
            location: location("Seattle", "USA", "47.6062,-122.3321"),
            device: device(DeviceType::Desktop, "Chrome", "macOS", "120.0"),
            duration_ms: 2345,
            request_size: 512,
            response_size: 65536,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            referrer: Some("https://app.company.com/analytics".to_string()),
            session_id: "sess_pqr678".to_string(),
            request_id: "req_stu901".to_string(),
            error_message: Some("Query took longer than expected".to_string()),
            stack_trace: None,
            tags: strings(&["database", "slow-query"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "7".to_string(),
            timestamp: at("2024-12-24T10:12:15.901Z"),
            status: LogStatus::Failed,
            level: LogLevel::Error,
            access_type: AccessType::Api,
            user: user("1", "Alex Chen", "alex@company.com"),
            resource: "/api/v2/payments/process".to_string(),
            method: "POST".to_string(),
            status_code: 500,
            ip_address: "192.168.1.100".to_string(),
            location: location("San Francisco", "USA", "37.7749,-122.4194"),
            device: device(DeviceType::Desktop, "Chrome", "macOS", "120.0"),
            duration_ms: 1234,
            request_size: 1024,
            response_size: 256,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            referrer: Some("https://app.company.com/checkout".to_string()),
            session_id: "sess_abc123".to_string(),
            request_id: "req_vwx234".to_string(),
            error_message: Some("Payment gateway timeout".to_string()),
            stack_trace: Some(
                "Error: Gateway timeout at PaymentService.process (/app/services/payment.ts:145:12)"
                    .to_string(),
            ),
            tags: strings(&["api", "payment", "error"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
        AccessLog {
            id: "8".to_string(),
            timestamp: at("2024-12-24T10:08:45.234Z"),
            status: LogStatus::Success,
            level: LogLevel::Info,
            access_type: AccessType::File,
            user: user("2", "Sarah Miller", "sarah@company.com"),
            resource: "/api/files/download/report-2024.pdf".to_string(),
            method: "GET".to_string(),
            status_code: 200,
            ip_address: "10.0.0.55".to_string(),
            location: location("New York", "USA", "40.7128,-74.0060"),
            device: device(DeviceType::Desktop, "Safari", "macOS", "17.2"),
            duration_ms: 789,
            request_size: 64,
            response_size: 2_097_152,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            referrer: Some("https://app.company.com/reports".to_string()),
            session_id: "sess_ghi789".to_string(),
            request_id: "req_yza567".to_string(),
            error_message: None,
            stack_trace: None,
            tags: strings(&["file", "download", "report"]),
            is_suspicious: false,
            is_bot: false,
            metadata: serde_json::Value::Null,
        },
    ]
}

fn contact(id: &str, name: &str, email: &str, title: &str) -> Contact {
    Contact {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        title: title.to_string(),
        is_primary: true,
    }
}

fn deal(id: &str, name: &str, value: f64, stage: DealStage, probability: u8) -> Deal {
    Deal {
        id: id.to_string(),
        name: name.to_string(),
        value,
        stage,
        probability,
        expected_close: None,
        created_at: at("2024-10-01T09:00:00Z"),
        owner: "You".to_string(),
        products: Vec::new(),
        notes: None,
    }
}

/// Five sample CRM clients, two of them customers
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn clients() -> Vec<Client> {
    vec![
        Client {
            id: "seed-c1".to_string(),
            name: "Sarah Chen".to_string(),
            company: "TechCorp Solutions".to_string(),
            industry: "Technology".to_string(),
            website: Some("https://techcorp.example".to_string()),
            status: ClientStatus::Customer,
            contacts: vec![contact("seed-c1", "Sarah Chen", "sarah@techcorp.example", "CTO")],
            revenue: 150_000.0,
            lifetime_value: 450_000.0,
            projects: 12,
            health_score: 92,
            nps: Some(9),
            created_at: at("2023-03-15T10:00:00Z"),
            last_activity: at("2024-12-20T14:00:00Z"),
            tags: strings(&["enterprise", "strategic"]),
            address: Address {
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                country: "USA".to_string(),
            },
            owner: "You".to_string(),
            team: strings(&["Alex Chen"]),
            source: "Referral".to_string(),
            deals: vec![
                deal("seed-c1-deal-1", "Platform expansion", 50_000.0, DealStage::Proposal, 60),
                deal("seed-c1-deal-2", "Annual renewal", 120_000.0, DealStage::ClosedWon, 100),
            ],
        },
        Client {
            id: "seed-c2".to_string(),
            name: "Michael Brown".to_string(),
            company: "Global Retail Inc".to_string(),
            industry: "Retail".to_string(),
            website: Some("https://globalretail.example".to_string()),
            status: ClientStatus::Customer,
            contacts: vec![contact(
                "seed-c2",
                "Michael Brown",
                "michael@globalretail.example",
                "VP Operations",
            )],
            revenue: 75_000.0,
            lifetime_value: 180_000.0,
            projects: 5,
            health_score: 78,
            nps: Some(8),
            created_at: at("2023-08-02T10:00:00Z"),
            last_activity: at("2024-12-18T11:00:00Z"),
            tags: strings(&["retail"]),
            address: Address {
                city: "Chicago".to_string(),
                state: "IL".to_string(),
                country: "USA".to_string(),
            },
            owner: "You".to_string(),
            team: Vec::new(),
            source: "Website".to_string(),
            deals: vec![deal(
                "seed-c2-deal-1",
                "Point of sale rollout",
                30_000.0,
                DealStage::Negotiation,
                80,
            )],
        },
        Client {
            id: "seed-c3".to_string(),
            name: "Lisa Park".to_string(),
            company: "HealthFirst Medical".to_string(),
            industry: "Healthcare".to_string(),
            website: None,
            status: ClientStatus::Opportunity,
            contacts: vec![contact(
                "seed-c3",
                "Lisa Park",
                "lisa@healthfirst.example",
                "Director of IT",
            )],
            revenue: 15_000.0,
            lifetime_value: 15_000.0,
            projects: 1,
            health_score: 65,
            nps: None,
            created_at: at("2024-06-10T10:00:00Z"),
            last_activity: at("2024-12-10T09:00:00Z"),
            tags: strings(&["healthcare", "compliance"]),
            address: Address::default(),
            owner: "You".to_string(),
            team: Vec::new(),
            source: "Conference".to_string(),
            deals: vec![deal(
                "seed-c3-deal-1",
                "Patient portal",
                40_000.0,
                DealStage::Discovery,
                30,
            )],
        },
        Client {
            id: "seed-c4".to_string(),
            name: "James Wilson".to_string(),
            company: "FinanceHub".to_string(),
            industry: "Finance".to_string(),
            website: Some("https://financehub.example".to_string()),
            status: ClientStatus::Prospect,
            contacts: vec![contact(
                "seed-c4",
                "James Wilson",
                "james@financehub.example",
                "Head of Product",
            )],
            revenue: 0.0,
            lifetime_value: 0.0,
            projects: 0,
            health_score: 55,
            nps: None,
            created_at: at("2024-11-20T10:00:00Z"),
            last_activity: at("2024-12-01T16:00:00Z"),
            tags: Vec::new(),
            address: Address::default(),
            owner: "You".to_string(),
            team: Vec::new(),
            source: "Direct".to_string(),
            deals: Vec::new(),
        },
        Client {
            id: "seed-c5".to_string(),
            name: "Emily Davis".to_string(),
            company: "EduLearn Academy".to_string(),
            industry: "Education".to_string(),
            website: None,
            status: ClientStatus::Churned,
            contacts: vec![contact(
                "seed-c5",
                "Emily Davis",
                "emily@edulearn.example",
                "Program Manager",
            )],
            revenue: 500.0,
            lifetime_value: 4_500.0,
            projects: 2,
            health_score: 25,
            nps: Some(4),
            created_at: at("2022-09-01T10:00:00Z"),
            last_activity: at("2024-05-01T10:00:00Z"),
            tags: strings(&["education"]),
            address: Address::default(),
            owner: "You".to_string(),
            team: Vec::new(),
            source: "Partner".to_string(),
            deals: Vec::new(),
        },
    ]
}

/// The four sample board users
#[must_use]
pub fn feedback_users() -> Vec<FeedbackUser> {
    let user = |id: &str,
                name: &str,
                email: &str,
                company: &str,
                plan: Plan,
                votes: u32,
                ideas: u32,
                joined: &str| {
        FeedbackUser {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            company: Some(company.to_string()),
            plan,
            total_votes: votes,
            ideas_submitted: ideas,
            joined_at: day(joined),
        }
    };

    vec![
        user("u1", "Sarah Chen", "sarah@company.com", "TechCorp", Plan::Enterprise, 47, 12, "2024-01-15"),
        user("u2", "Mike Johnson", "mike@startup.io", "Startup.io", Plan::Pro, 23, 8, "2024-02-20"),
        user("u3", "Emily Davis", "emily@design.co", "Design Co", Plan::Pro, 35, 15, "2024-01-08"),
        user("u4", "James Wilson", "james@enterprise.com", "Enterprise Inc", Plan::Enterprise, 89, 22, "2023-11-30"),
    ]
}

fn response(message: &str, responded_at: &str, responded_by: &str) -> Option<AdminResponse> {
    Some(AdminResponse {
        message: message.to_string(),
        responded_at: at(responded_at),
        responded_by: responded_by.to_string(),
    })
}

/// The six sample ideas
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn ideas() -> Vec<Idea> {
    let users = feedback_users();
    let author = |index: usize| users.get(index).cloned().unwrap_or_else(unknown_user);

    vec![
        Idea {
            id: "idea1".to_string(),
            title: "Dark mode support across all pages".to_string(),
            description: "Add a system-wide dark mode toggle that respects user preferences and provides a comfortable viewing experience in low-light environments. Should sync across devices.".to_string(),
            category: IdeaCategory::Feature,
            status: IdeaStatus::InProgress,
            priority: Priority::Critical,
            votes: 342,
            voters: strings(&["u1", "u2", "u3"]),
            comments: 45,
            author: author(0),
            created_at: at("2024-06-15T10:00:00Z"),
            updated_at: at("2024-12-20T14:30:00Z"),
            planned_release: Some("Q1 2025".to_string()),
            linked_ideas: strings(&["idea5"]),
            tags: strings(&["accessibility", "ui", "theming"]),
            impact_score: 92,
            effort_score: 65,
            admin_response: response(
                "Great suggestion! Currently in development.",
                "2024-12-01T09:00:00Z",
                "Product Team",
            ),
            merged_into: None,
            subscribers: 156,
            views: 2341,
            product: Some("Core Platform".to_string()),
        },
        Idea {
            id: "idea2".to_string(),
            title: "API webhook improvements".to_string(),
            description: "Add retry logic, better error handling, and a webhook testing interface. Include delivery status tracking and historical logs for debugging.".to_string(),
            category: IdeaCategory::Improvement,
            status: IdeaStatus::Planned,
            priority: Priority::Important,
            votes: 187,
            voters: strings(&["u4"]),
            comments: 23,
            author: author(3),
            created_at: at("2024-08-10T11:00:00Z"),
            updated_at: at("2024-12-18T16:00:00Z"),
            planned_release: Some("Q2 2025".to_string()),
            linked_ideas: Vec::new(),
            tags: strings(&["api", "developer-experience", "integrations"]),
            impact_score: 85,
            effort_score: 78,
            admin_response: None,
            merged_into: None,
            subscribers: 89,
            views: 1567,
            product: Some("Developer API".to_string()),
        },
        Idea {
            id: "idea3".to_string(),
            title: "Slack integration for notifications".to_string(),
            description: "Native Slack integration to receive real-time notifications about important events, mentions, and updates directly in Slack channels.".to_string(),
            category: IdeaCategory::Integration,
            status: IdeaStatus::Shipped,
            priority: Priority::Important,
            votes: 256,
            voters: strings(&["u1", "u2"]),
            comments: 67,
            author: author(1),
            created_at: at("2024-03-20T09:00:00Z"),
            updated_at: at("2024-11-01T10:00:00Z"),
            planned_release: None,
            linked_ideas: Vec::new(),
            tags: strings(&["slack", "notifications", "productivity"]),
            impact_score: 88,
            effort_score: 45,
            admin_response: response(
                "Shipped in v2.5! Check it out.",
                "2024-11-01T10:00:00Z",
                "Engineering Team",
            ),
            merged_into: None,
            subscribers: 234,
            views: 4521,
            product: Some("Integrations".to_string()),
        },
        Idea {
            id: "idea4".to_string(),
            title: "Mobile app for iOS and Android".to_string(),
            description: "Native mobile applications with offline support, push notifications, and full feature parity with the web app.".to_string(),
            category: IdeaCategory::Feature,
            status: IdeaStatus::UnderReview,
            priority: Priority::Critical,
            votes: 523,
            voters: strings(&["u1", "u2", "u3", "u4"]),
            comments: 89,
            author: author(2),
            created_at: at("2024-01-05T08:00:00Z"),
            updated_at: at("2024-12-22T11:00:00Z"),
            planned_release: None,
            linked_ideas: Vec::new(),
            tags: strings(&["mobile", "ios", "android", "offline"]),
            impact_score: 95,
            effort_score: 92,
            admin_response: None,
            merged_into: None,
            subscribers: 312,
            views: 6782,
            product: Some("Mobile".to_string()),
        },
        Idea {
            id: "idea5".to_string(),
            title: "Custom color themes beyond dark/light".to_string(),
            description: "Allow users to create and save custom color themes with their preferred color palette. Include theme marketplace for sharing.".to_string(),
            category: IdeaCategory::Feature,
            status: IdeaStatus::New,
            priority: Priority::NiceToHave,
            votes: 98,
            voters: strings(&["u3"]),
            comments: 12,
            author: author(2),
            created_at: at("2024-11-28T14:00:00Z"),
            updated_at: at("2024-12-15T09:00:00Z"),
            planned_release: None,
            linked_ideas: strings(&["idea1"]),
            tags: strings(&["theming", "customization", "ui"]),
            impact_score: 45,
            effort_score: 55,
            admin_response: None,
            merged_into: None,
            subscribers: 67,
            views: 890,
            product: Some("Core Platform".to_string()),
        },
        Idea {
            id: "idea6".to_string(),
            title: "Performance improvements for large datasets".to_string(),
            description: "Optimize rendering and data fetching for users with 10k+ items. Include virtual scrolling and lazy loading.".to_string(),
            category: IdeaCategory::Performance,
            status: IdeaStatus::InProgress,
            priority: Priority::Critical,
            votes: 189,
            voters: strings(&["u4"]),
            comments: 34,
            author: author(3),
            created_at: at("2024-09-12T16:00:00Z"),
            updated_at: at("2024-12-21T10:00:00Z"),
            planned_release: Some("Q1 2025".to_string()),
            linked_ideas: Vec::new(),
            tags: strings(&["performance", "scalability", "enterprise"]),
            impact_score: 90,
            effort_score: 80,
            admin_response: response(
                "Priority item for Q1. Virtual scrolling being implemented now.",
                "2024-12-10T15:00:00Z",
                "Engineering Team",
            ),
            merged_into: None,
            subscribers: 145,
            views: 2156,
            product: Some("Core Platform".to_string()),
        },
    ]
}

/// The five sample NPS answers
#[must_use]
pub fn nps_responses() -> Vec<NpsResponse> {
    let users = feedback_users();
    let answer = |id: &str,
                  score: u8,
                  feedback: &str,
                  index: usize,
                  created: &str,
                  followed_up: bool,
                  tags: &[&str]| {
        NpsResponse {
            id: id.to_string(),
            score,
            feedback: feedback.to_string(),
            user: users.get(index).cloned().unwrap_or_else(unknown_user),
            created_at: at(created),
            followed_up,
            tags: strings(tags),
        }
    };

    vec![
        answer("nps1", 10, "Amazing product! Has transformed our workflow.", 0, "2024-12-20T10:00:00Z", true, &["workflow", "positive"]),
        answer("nps2", 8, "Good product but missing some features we need.", 1, "2024-12-19T11:00:00Z", false, &["features"]),
        answer("nps3", 9, "Great support team and solid product.", 2, "2024-12-18T09:00:00Z", true, &["support", "positive"]),
        answer("nps4", 6, "Performance issues with large datasets.", 3, "2024-12-17T14:00:00Z", true, &["performance", "enterprise"]),
        answer("nps5", 10, "Best tool weve used. Highly recommend!", 0, "2024-12-16T08:00:00Z", false, &["recommendation"]),
    ]
}

/// Placeholder author for records whose user could not be resolved
#[must_use]
pub fn unknown_user() -> FeedbackUser {
    FeedbackUser {
        id: String::new(),
        name: "Unknown".to_string(),
        email: String::new(),
        company: None,
        plan: Plan::Free,
        total_votes: 0,
        ideas_submitted: 0,
        joined_at: NaiveDate::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NpsCategory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_timestamps_parse() {
        let epoch = DateTime::<Utc>::default();
        assert!(access_logs().iter().all(|l| l.timestamp != epoch));
        assert!(ideas().iter().all(|i| i.created_at != epoch));
        assert!(feedback_users().iter().all(|u| u.joined_at != NaiveDate::default()));
    }

    #[test]
    fn test_access_logs_are_newest_first() {
        let logs = access_logs();
        assert_eq!(logs.len(), 8);
        assert!(logs.windows(2).all(|w| match w {
            [a, b] => a.timestamp > b.timestamp,
            _ => true,
        }));
    }

    #[test]
    fn test_clients_have_two_customers() {
        let clients = clients();
        assert_eq!(clients.len(), 5);
        let customers = clients
            .iter()
            .filter(|c| c.status == ClientStatus::Customer)
            .count();
        assert_eq!(customers, 2);
    }

    #[test]
    fn test_ideas_votes() {
        let votes: Vec<u32> = ideas().iter().map(|i| i.votes).collect();
        assert_eq!(votes, vec![342, 187, 256, 523, 98, 189]);
        assert!(ideas().iter().all(|i| !i.author.name.is_empty()));
    }

    #[test]
    fn test_nps_categories_are_derived() {
        let categories: Vec<NpsCategory> = nps_responses().iter().map(NpsResponse::category).collect();
        assert_eq!(
            categories,
            vec![
                NpsCategory::Promoter,
                NpsCategory::Passive,
                NpsCategory::Promoter,
                NpsCategory::Detractor,
                NpsCategory::Promoter,
            ]
        );
    }
}
