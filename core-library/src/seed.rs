//! Canned data set the mock backend starts from

use crate::models::*;

fn s(value: &str) -> String {
    value.to_string()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn tenants() -> Vec<TenantProfile> {
    vec![
        TenantProfile {
            uid: s("tenant-101"),
            room_number: s("101"),
            name: s("John Doe"),
            email: s("john@example.com"),
            phone: s("+91 9876543210"),
            aadhaar_number: s("1234-5678-9012"),
            emergency_contact: Some(EmergencyContact {
                name: s("Jane Doe"),
                phone: s("+91 9876543211"),
                relation: s("Sister"),
            }),
            documents: TenantDocuments {
                aadhaar: Some(s("https://example.com/aadhaar.pdf")),
                photo: Some(s("https://example.com/photo.jpg")),
            },
            is_onboarding_complete: true,
            created_at: s("2024-01-15T10:00:00Z"),
            updated_at: s("2024-01-15T10:00:00Z"),
        },
        TenantProfile {
            uid: s("tenant-102"),
            room_number: s("102"),
            name: s("Alice Smith"),
            email: s("alice@example.com"),
            phone: s("+91 9876543212"),
            aadhaar_number: s("2345-6789-0123"),
            emergency_contact: Some(EmergencyContact {
                name: s("Bob Smith"),
                phone: s("+91 9876543213"),
                relation: s("Husband"),
            }),
            documents: TenantDocuments {
                aadhaar: Some(s("https://example.com/aadhaar2.pdf")),
                photo: Some(s("https://example.com/photo2.jpg")),
            },
            is_onboarding_complete: true,
            created_at: s("2024-01-16T10:00:00Z"),
            updated_at: s("2024-01-16T10:00:00Z"),
        },
    ]
}

pub fn rooms() -> Vec<Room> {
    vec![
        Room {
            id: s("room-101"),
            room_number: s("101"),
            floor: 1,
            room_type: RoomType::Single,
            rent: 8000.0,
            deposit: 16000.0,
            amenities: strings(&["AC", "WiFi", "Attached Bathroom"]),
            is_occupied: true,
            tenant_id: Some(s("tenant-101")),
            created_at: s("2024-01-01T00:00:00Z"),
            updated_at: s("2024-01-15T10:00:00Z"),
        },
        Room {
            id: s("room-102"),
            room_number: s("102"),
            floor: 1,
            room_type: RoomType::Single,
            rent: 8500.0,
            deposit: 17000.0,
            amenities: strings(&["AC", "WiFi", "Attached Bathroom", "Balcony"]),
            is_occupied: true,
            tenant_id: Some(s("tenant-102")),
            created_at: s("2024-01-01T00:00:00Z"),
            updated_at: s("2024-01-16T10:00:00Z"),
        },
        Room {
            id: s("room-103"),
            room_number: s("103"),
            floor: 1,
            room_type: RoomType::Double,
            rent: 12000.0,
            deposit: 24000.0,
            amenities: strings(&["AC", "WiFi", "Attached Bathroom", "Balcony"]),
            is_occupied: false,
            tenant_id: None,
            created_at: s("2024-01-01T00:00:00Z"),
            updated_at: s("2024-01-01T00:00:00Z"),
        },
    ]
}

pub fn payments() -> Vec<Payment> {
    vec![
        Payment {
            id: s("payment-1"),
            tenant_id: s("tenant-101"),
            room_number: s("101"),
            amount: 8000.0,
            payment_type: PaymentType::Rent,
            month: s("2024-01"),
            status: PaymentStatus::Verified,
            payment_method: PaymentMethod::Upi,
            transaction_id: Some(s("TXN123456789")),
            receipt_url: Some(s("https://example.com/receipt1.pdf")),
            submitted_at: s("2024-01-05T10:00:00Z"),
            verified_at: Some(s("2024-01-05T11:00:00Z")),
        },
        Payment {
            id: s("payment-2"),
            tenant_id: s("tenant-102"),
            room_number: s("102"),
            amount: 8500.0,
            payment_type: PaymentType::Rent,
            month: s("2024-01"),
            status: PaymentStatus::Pending,
            payment_method: PaymentMethod::BankTransfer,
            transaction_id: Some(s("TXN987654321")),
            receipt_url: Some(s("https://example.com/receipt2.pdf")),
            submitted_at: s("2024-01-06T10:00:00Z"),
            verified_at: None,
        },
    ]
}

pub fn service_requests() -> Vec<ServiceRequest> {
    vec![
        ServiceRequest {
            id: s("service-1"),
            tenant_id: s("tenant-101"),
            room_number: s("101"),
            request_type: ServiceRequestType::Maintenance,
            title: s("AC not working"),
            description: s("The air conditioner in my room is not cooling properly."),
            priority: Priority::High,
            status: ServiceRequestStatus::InProgress,
            notes: None,
            created_at: s("2024-01-10T10:00:00Z"),
            updated_at: s("2024-01-11T10:00:00Z"),
        },
        ServiceRequest {
            id: s("service-2"),
            tenant_id: s("tenant-102"),
            room_number: s("102"),
            request_type: ServiceRequestType::Cleaning,
            title: s("Deep cleaning request"),
            description: s("Need deep cleaning service for the room."),
            priority: Priority::Medium,
            status: ServiceRequestStatus::Pending,
            notes: None,
            created_at: s("2024-01-12T10:00:00Z"),
            updated_at: s("2024-01-12T10:00:00Z"),
        },
    ]
}

pub fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: s("notif-1"),
            user_id: s("tenant-101"),
            kind: s("payment"),
            title: s("Payment Verified"),
            message: s("Your rent payment for January 2024 has been verified."),
            action_url: None,
            read: false,
            created_at: s("2024-01-05T11:00:00Z"),
        },
        Notification {
            id: s("notif-2"),
            user_id: s("tenant-102"),
            kind: s("service"),
            title: s("Service Request Update"),
            message: s("Your maintenance request is now in progress."),
            action_url: None,
            read: false,
            created_at: s("2024-01-11T10:00:00Z"),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_rooms_hold_occupancy_invariant() {
        for room in rooms() {
            assert!(room.validate().is_ok(), "{} violates invariant", room.id);
        }
    }

    #[test]
    fn test_seed_rooms_reference_seed_tenants() {
        let tenants = tenants();
        for room in rooms() {
            if let Some(tenant_id) = &room.tenant_id {
                assert!(tenants.iter().any(|t| &t.uid == tenant_id));
            }
        }
    }
}
