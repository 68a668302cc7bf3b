//! Deadline rules over equipment records.
//!
//! Each rule looks at one date field and yields at most one notification per
//! equipment item: overdue when the date has passed, due when it falls inside
//! the rule's look-ahead window, nothing otherwise.

use time::{Duration, OffsetDateTime};

use crate::domain::equipment::Equipment;
use crate::domain::notification::{NewNotification, NotificationType, Priority};

struct Outcome {
    notification_type: NotificationType,
    priority: Priority,
    title: &'static str,
    verb: &'static str,
}

struct DeadlineRule {
    window_days: i64,
    date: fn(&Equipment) -> Option<OffsetDateTime>,
    overdue: Outcome,
    due: Outcome,
}

fn next_maintenance(equipment: &Equipment) -> Option<OffsetDateTime> {
    equipment.next_maintenance
}

fn certification_expiry(equipment: &Equipment) -> Option<OffsetDateTime> {
    equipment
        .certification_required
        .then_some(equipment.certification_expiry)
        .flatten()
}

fn next_inspection(equipment: &Equipment) -> Option<OffsetDateTime> {
    equipment.next_inspection
}

const MAINTENANCE: DeadlineRule = DeadlineRule {
    window_days: 7,
    date: next_maintenance,
    overdue: Outcome {
        notification_type: NotificationType::MaintenanceOverdue,
        priority: Priority::High,
        title: "Maintenance Overdue",
        verb: "maintenance was due on",
    },
    due: Outcome {
        notification_type: NotificationType::MaintenanceDue,
        priority: Priority::Medium,
        title: "Maintenance Due Soon",
        verb: "is scheduled for maintenance on",
    },
};

const CERTIFICATION: DeadlineRule = DeadlineRule {
    window_days: 30,
    date: certification_expiry,
    overdue: Outcome {
        notification_type: NotificationType::CertificationExpired,
        priority: Priority::Critical,
        title: "Certification Expired",
        verb: "certification expired on",
    },
    due: Outcome {
        notification_type: NotificationType::CertificationExpiring,
        priority: Priority::High,
        title: "Certification Expiring Soon",
        verb: "certification expires on",
    },
};

const INSPECTION: DeadlineRule = DeadlineRule {
    window_days: 14,
    date: next_inspection,
    overdue: Outcome {
        notification_type: NotificationType::InspectionOverdue,
        priority: Priority::High,
        title: "Inspection Overdue",
        verb: "inspection was due on",
    },
    due: Outcome {
        notification_type: NotificationType::InspectionDue,
        priority: Priority::Medium,
        title: "Inspection Due Soon",
        verb: "is scheduled for inspection on",
    },
};

impl DeadlineRule {
    fn apply(&self, equipment: &Equipment, now: OffsetDateTime) -> Option<NewNotification> {
        let date = (self.date)(equipment)?;
        let outcome = if date < now {
            &self.overdue
        } else if date <= now + Duration::days(self.window_days) {
            &self.due
        } else {
            return None;
        };

        Some(NewNotification {
            notification_type: outcome.notification_type,
            title: outcome.title.to_string(),
            message: format!("{} {} {}", equipment.name, outcome.verb, date.date()),
            priority: outcome.priority,
            equipment_id: Some(equipment.id),
            equipment_name: Some(equipment.name.clone()),
            action_url: Some(equipment.detail_url()),
        })
    }
}

pub fn maintenance(equipment: &[Equipment], now: OffsetDateTime) -> Vec<NewNotification> {
    run(&MAINTENANCE, equipment, now)
}

pub fn certification(equipment: &[Equipment], now: OffsetDateTime) -> Vec<NewNotification> {
    run(&CERTIFICATION, equipment, now)
}

pub fn inspection(equipment: &[Equipment], now: OffsetDateTime) -> Vec<NewNotification> {
    run(&INSPECTION, equipment, now)
}

/// All three rule sets, maintenance first, then certification, then inspection.
pub fn evaluate(equipment: &[Equipment], now: OffsetDateTime) -> Vec<NewNotification> {
    let mut out = maintenance(equipment, now);
    out.extend(certification(equipment, now));
    out.extend(inspection(equipment, now));
    out
}

fn run(rule: &DeadlineRule, equipment: &[Equipment], now: OffsetDateTime) -> Vec<NewNotification> {
    equipment
        .iter()
        .filter_map(|item| rule.apply(item, now))
        .collect()
}
