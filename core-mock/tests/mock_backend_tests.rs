//! Behaviour of the mock backend as the UI sees it

use bridge_traits::{ManualClock, SystemClock};
use chrono::{TimeZone, Utc};
use core_auth::{OwnerCredentials, TenantCredentials, UserRole};
use core_library::{
    NewPayment, NewRoom, PageQuery, PaymentMethod, PaymentStatus, PaymentType, RentalStore,
    RoomPatch, RoomType, ServiceRequestStatus,
};
use core_mock::{MockBackend, PushUpdate, MOCK_UPDATE_KINDS};
use core_runtime::config::{FeedSettings, MockLatency};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn backend() -> MockBackend {
    MockBackend::new(
        Arc::new(RentalStore::seeded()),
        MockLatency::none(),
        FeedSettings::mock_backend(),
        Arc::new(SystemClock),
    )
}

fn backend_with_feed(feed: FeedSettings) -> MockBackend {
    MockBackend::new(
        Arc::new(RentalStore::seeded()),
        MockLatency::none(),
        feed,
        Arc::new(SystemClock),
    )
}

fn every_tick() -> FeedSettings {
    FeedSettings {
        interval: Duration::from_secs(10),
        probability: 1.0,
    }
}

#[tokio::test]
async fn tenant_login_succeeds_with_matching_aadhaar() {
    let response = backend()
        .login(&TenantCredentials::new("101", "1234-5678-9012"))
        .await;

    assert!(response.success);
    let user = response.data.unwrap();
    assert_eq!(user.user.role, UserRole::Tenant);
    assert_eq!(user.user.room_number.as_deref(), Some("101"));
}

#[tokio::test]
async fn tenant_login_rejects_wrong_aadhaar() {
    let response = backend().login(&TenantCredentials::new("101", "wrong")).await;

    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn owner_login_rejects_other_accounts() {
    let response = backend()
        .login_owner(&OwnerCredentials::new("tenant@example.com", "password"))
        .await;

    assert_eq!(response.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn success_flag_tracks_whether_a_record_was_found() {
    let backend = backend();

    assert!(backend.get_room_by_id("room-101").await.success);
    assert!(backend.get_tenant_profile("tenant-102").await.success);

    let missing_room = backend.get_room_by_id("room-404").await;
    assert!(!missing_room.success);
    assert_eq!(missing_room.error.as_deref(), Some("Room not found"));

    let missing_tenant = backend.delete_tenant("tenant-404").await;
    assert_eq!(missing_tenant.error.as_deref(), Some("Tenant not found"));

    let missing_payment = backend
        .update_payment_status("payment-404", PaymentStatus::Verified)
        .await;
    assert_eq!(missing_payment.error.as_deref(), Some("Payment not found"));

    let missing_notification = backend.mark_notification_as_read("notif-404").await;
    assert_eq!(
        missing_notification.error.as_deref(),
        Some("Notification not found")
    );

    let missing_file = backend.delete_file("file-404").await;
    assert_eq!(missing_file.error.as_deref(), Some("File not found"));
}

#[tokio::test]
async fn submitted_payment_is_pending_and_listed_for_tenant() {
    let backend = backend();
    let submitted = backend
        .submit_payment(&NewPayment {
            tenant_id: "tenant-101".to_string(),
            room_number: "101".to_string(),
            amount: 8000.0,
            payment_type: PaymentType::Rent,
            month: "2024-02".to_string(),
            payment_method: PaymentMethod::Upi,
            transaction_id: None,
            receipt_url: None,
        })
        .await
        .data
        .unwrap();

    assert_eq!(submitted.status, PaymentStatus::Pending);

    let payments = backend.get_tenant_payments("tenant-101").await.data.unwrap();
    assert!(payments.iter().any(|p| p.id == submitted.id && p.amount == 8000.0));
}

#[tokio::test]
async fn completing_a_service_request_changes_only_status_and_timestamp() {
    let backend = backend();
    let before = backend
        .get_tenant_service_requests("tenant-101")
        .await
        .data
        .unwrap()
        .remove(0);

    let after = backend
        .update_service_request_status(&before.id, ServiceRequestStatus::Completed)
        .await
        .data
        .unwrap();

    assert_eq!(after.status, ServiceRequestStatus::Completed);
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.priority, before.priority);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.notes, before.notes);
    assert_ne!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn mark_all_read_twice_leaves_everything_read() {
    let backend = backend();

    for _ in 0..2 {
        let response = backend.mark_all_notifications_as_read("tenant-101").await;
        assert!(response.success);

        let notifications = backend.get_notifications("tenant-101").await.data.unwrap();
        assert!(!notifications.is_empty());
        assert!(notifications.iter().all(|n| n.read));
    }
}

#[tokio::test]
async fn list_calls_return_whole_collection_and_echo_page() {
    let backend = backend();
    let page = backend
        .get_all_payments(&PageQuery::new(3, 1).filter("status", "pending"))
        .await
        .data
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total, 2);
    assert_eq!(page.page, 3);
    assert_eq!(page.limit, 1);
    assert!(!page.has_more);
}

#[tokio::test]
async fn room_updates_that_break_occupancy_are_rejected() {
    let backend = backend();

    let response = backend
        .update_room(
            "room-101",
            &RoomPatch {
                tenant_id: Some(None),
                ..Default::default()
            },
        )
        .await;
    assert!(!response.success);

    let room = backend.get_room_by_id("room-101").await.data.unwrap();
    assert_eq!(room.tenant_id.as_deref(), Some("tenant-101"));

    let created = backend
        .create_room(&NewRoom {
            room_number: "104".to_string(),
            floor: 1,
            room_type: RoomType::Triple,
            rent: 14000.0,
            deposit: 28000.0,
            amenities: vec![],
            is_occupied: true,
            tenant_id: None,
        })
        .await;
    assert!(!created.success);
}

#[tokio::test]
async fn document_upload_records_link_on_profile() {
    let backend = backend();
    let link = backend
        .upload_tenant_document(
            "tenant-102",
            &core_library::FileUpload::new("id.pdf", "application/pdf", vec![1, 2]),
            "aadhaar",
        )
        .await
        .data
        .unwrap();

    assert_eq!(link.url, "https://example.com/aadhaar-tenant-102.pdf");
    let tenant = backend.get_tenant_profile("tenant-102").await.data.unwrap();
    assert_eq!(tenant.documents.aadhaar.as_deref(), Some(link.url.as_str()));
}

#[tokio::test]
async fn created_ids_follow_the_clock() {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    let backend = MockBackend::new(
        Arc::new(RentalStore::seeded_with_clock(clock.clone())),
        MockLatency::none(),
        FeedSettings::mock_backend(),
        clock,
    );

    let note = backend
        .add_service_request_note("service-1", "Technician booked")
        .await
        .data
        .unwrap();
    let note = &note.notes.unwrap()[0];

    assert_eq!(note.id, "note-1709251200000");
    assert_eq!(note.created_by, "owner-1");
    assert_eq!(note.created_at, "2024-03-01T00:00:00.000Z");
}

#[tokio::test(start_paused = true)]
async fn feed_delivers_catalogue_updates_on_each_tick() {
    let backend = backend_with_feed(every_tick());
    let received: Arc<Mutex<Vec<PushUpdate>>> = Arc::default();
    let sink = received.clone();

    let _subscription = backend.subscribe_to_updates("tenant-101", move |update| {
        sink.lock().push(update);
    });

    tokio::time::sleep(Duration::from_secs(35)).await;

    let received = received.lock();
    assert_eq!(received.len(), 3);
    for update in received.iter() {
        assert!(MOCK_UPDATE_KINDS.contains(&update.kind.as_str()));
        assert_eq!(
            update.data["message"],
            format!("Mock {} update", update.kind)
        );
    }
}

#[tokio::test(start_paused = true)]
async fn feed_with_zero_probability_stays_silent() {
    let backend = backend_with_feed(FeedSettings {
        interval: Duration::from_secs(10),
        probability: 0.0,
    });
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let _subscription = backend.subscribe_to_updates("tenant-101", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn no_callbacks_after_cancel() {
    let backend = backend_with_feed(every_tick());
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let mut subscription = backend.subscribe_to_updates("tenant-101", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    subscription.cancel();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!subscription.is_active());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_subscription_cancels_it() {
    let backend = backend_with_feed(every_tick());
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();

    let subscription = backend.subscribe_to_updates("tenant-102", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    drop(subscription);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
