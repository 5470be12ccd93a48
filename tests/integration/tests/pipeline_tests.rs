//! End-to-end tests for the moderation pipeline
//!
//! Exercise submit/resolve/execute against in-memory doubles: permission
//! gating, threshold resolution, offsetting, escalation execution, and
//! announcement delivery.

use std::time::Duration;

use chrono::Utc;

use integration_tests::TestHarness;
use warden_core::{EscalationAction, EscalationRule, GuildSettings, RecordKind, Snowflake};
use warden_service::{
    AnnouncementService, EscalationService, ExecutionOutcome, ModerationService, ServiceError,
    SettingsService, SubmitRecord,
};

fn warning(harness: &TestHarness, user_id: Snowflake, operator_id: Snowflake, magnitude: i32) -> SubmitRecord {
    SubmitRecord {
        guild_id: harness.guild_id,
        user_id,
        user_display_name: "Member".to_string(),
        kind: RecordKind::Warning,
        magnitude,
        reason: Some("spamming".to_string()),
        operator_id,
        operator_display_name: "Operator".to_string(),
    }
}

fn timeout_rule(guild_id: Snowflake, threshold: i32) -> EscalationRule {
    EscalationRule::new(
        guild_id,
        RecordKind::Warning,
        threshold,
        EscalationAction::Timeout,
        Some(60),
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn below_threshold_appends_without_escalation() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));

    let service = ModerationService::new(&harness.context);
    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    assert!(submission.escalation.is_none());
    assert_eq!(submission.standing.effective_warning, 1);
    assert_eq!(harness.records.count_for(harness.guild_id, member), 1);
    assert_eq!(harness.platform.timeout_count(), 0);
}

#[tokio::test]
async fn third_warning_fires_timeout_exactly_once() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));

    let service = ModerationService::new(&harness.context);
    for _ in 0..2 {
        let submission = service
            .submit_record(warning(&harness, member, harness.owner_id, 1))
            .await
            .unwrap();
        assert!(submission.escalation.is_none());
    }

    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    match submission.escalation {
        Some(ExecutionOutcome::Applied { ref rule }) => assert_eq!(rule.threshold, 3),
        other => panic!("expected applied escalation, got {other:?}"),
    }
    assert_eq!(harness.platform.timeout_count(), 1);
}

#[tokio::test]
async fn high_magnitude_fires_only_highest_reached_rule() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));
    harness.rules.seed(
        EscalationRule::new(
            harness.guild_id,
            RecordKind::Warning,
            5,
            EscalationAction::Kick,
            None,
            None,
        )
        .unwrap(),
    );
    harness.rules.seed(
        EscalationRule::new(
            harness.guild_id,
            RecordKind::Warning,
            8,
            EscalationAction::Ban,
            None,
            None,
        )
        .unwrap(),
    );

    let service = ModerationService::new(&harness.context);
    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 6))
        .await
        .unwrap();

    match submission.escalation {
        Some(ExecutionOutcome::Applied { ref rule }) => {
            assert_eq!(rule.threshold, 5);
            assert_eq!(rule.action, EscalationAction::Kick);
        }
        other => panic!("expected kick at threshold 5, got {other:?}"),
    }
    assert_eq!(harness.platform.timeout_count(), 0);
    assert_eq!(harness.platform.kick_count(), 1);
    assert!(harness.platform.bans.lock().unwrap().is_empty());
}

#[tokio::test]
async fn offsetting_suppresses_escalation() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));

    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.offset_enabled = true;
    harness.settings.seed(settings);

    let service = ModerationService::new(&harness.context);
    for _ in 0..2 {
        let mut command = warning(&harness, member, harness.owner_id, 1);
        command.kind = RecordKind::Commendation;
        service.submit_record(command).await.unwrap();
    }
    for _ in 0..2 {
        service
            .submit_record(warning(&harness, member, harness.owner_id, 1))
            .await
            .unwrap();
    }

    // Three warnings against two commendations: effective warning is 1.
    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    assert_eq!(submission.standing.warning_total, 3);
    assert_eq!(submission.standing.effective_warning, 1);
    assert!(submission.escalation.is_none());
    assert_eq!(harness.platform.timeout_count(), 0);
}

#[tokio::test]
async fn raw_totals_fire_when_offset_disabled() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));

    let service = ModerationService::new(&harness.context);
    for _ in 0..5 {
        let mut command = warning(&harness, member, harness.owner_id, 1);
        command.kind = RecordKind::Commendation;
        service.submit_record(command).await.unwrap();
    }
    for _ in 0..2 {
        service
            .submit_record(warning(&harness, member, harness.owner_id, 1))
            .await
            .unwrap();
    }

    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    assert_eq!(submission.standing.effective_warning, 3);
    assert!(matches!(
        submission.escalation,
        Some(ExecutionOutcome::Applied { .. })
    ));
}

#[tokio::test]
async fn delegated_admin_can_write_directly_and_by_role() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    let direct_admin = harness.join_member();
    let role_holder = harness.join_member();
    let mod_role = integration_tests::unique_id();

    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.admin_ids = vec![direct_admin, mod_role];
    harness.settings.seed(settings);
    harness.platform.give_role(harness.guild_id, role_holder, mod_role);

    let service = ModerationService::new(&harness.context);
    service
        .submit_record(warning(&harness, member, direct_admin, 1))
        .await
        .unwrap();
    service
        .submit_record(warning(&harness, member, role_holder, 1))
        .await
        .unwrap();

    assert_eq!(harness.records.count_for(harness.guild_id, member), 2);
}

#[tokio::test]
async fn unauthorized_operator_leaves_no_trace() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    let stranger = harness.join_member();

    let service = ModerationService::new(&harness.context);
    let err = service
        .submit_record(warning(&harness, member, stranger, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied { .. }));
    assert_eq!(harness.records.count_for(harness.guild_id, member), 0);
    assert_eq!(harness.platform.timeout_count(), 0);
}

#[tokio::test]
async fn delegated_admin_cannot_target_owner_or_peer() {
    let harness = TestHarness::new();
    let admin_a = harness.join_member();
    let admin_b = harness.join_member();

    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.admin_ids = vec![admin_a, admin_b];
    harness.settings.seed(settings);

    let service = ModerationService::new(&harness.context);

    let err = service
        .submit_record(warning(&harness, admin_b, admin_a, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));

    let err = service
        .submit_record(warning(&harness, harness.owner_id, admin_a, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));

    assert_eq!(harness.records.count_for(harness.guild_id, admin_b), 0);
}

#[tokio::test]
async fn owner_may_target_delegated_admin() {
    let harness = TestHarness::new();
    let admin = harness.join_member();

    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.admin_ids = vec![admin];
    harness.settings.seed(settings);

    let service = ModerationService::new(&harness.context);
    service
        .submit_record(warning(&harness, admin, harness.owner_id, 1))
        .await
        .unwrap();

    assert_eq!(harness.records.count_for(harness.guild_id, admin), 1);
}

#[tokio::test]
async fn platform_failure_keeps_the_record() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 1));
    harness.platform.set_fail_all(true);

    let service = ModerationService::new(&harness.context);
    let submission = service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    match submission.escalation {
        Some(ExecutionOutcome::Failed { ref reason, .. }) => {
            assert!(reason.contains("unavailable"), "reason: {reason}");
        }
        other => panic!("expected failed escalation, got {other:?}"),
    }
    assert_eq!(harness.records.count_for(harness.guild_id, member), 1);
    assert_eq!(harness.platform.timeout_count(), 0);
}

#[tokio::test]
async fn concurrent_submissions_remove_member_once() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(
        EscalationRule::new(
            harness.guild_id,
            RecordKind::Warning,
            3,
            EscalationAction::Kick,
            None,
            None,
        )
        .unwrap(),
    );

    let first = {
        let context = harness.context.clone();
        let command = warning(&harness, member, harness.owner_id, 2);
        tokio::spawn(async move {
            ModerationService::new(&context).submit_record(command).await
        })
    };
    let second = {
        let context = harness.context.clone();
        let command = warning(&harness, member, harness.owner_id, 2);
        tokio::spawn(async move {
            ModerationService::new(&context).submit_record(command).await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Both submissions may resolve the kick rule, but only one removal can
    // land; the loser observes the member gone and reports failure.
    assert_eq!(harness.platform.kick_count(), 1);
    assert_eq!(harness.records.count_for(harness.guild_id, member), 2);
}

#[tokio::test]
async fn lock_registry_drains_after_submissions() {
    let harness = TestHarness::new();
    let first_member = harness.join_member();
    let second_member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 3));

    let service = ModerationService::new(&harness.context);
    service
        .submit_record(warning(&harness, first_member, harness.owner_id, 1))
        .await
        .unwrap();
    assert_eq!(harness.context.escalation_lock_count(), 0);

    // Racing submissions on distinct members still leave nothing retained
    // once both finish.
    let tasks: Vec<_> = [first_member, second_member]
        .into_iter()
        .map(|member| {
            let context = harness.context.clone();
            let command = warning(&harness, member, harness.owner_id, 1);
            tokio::spawn(async move {
                ModerationService::new(&context).submit_record(command).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(harness.context.escalation_lock_count(), 0);
}

#[tokio::test]
async fn escalation_summary_reaches_log_channel() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    let channel = integration_tests::unique_id();
    harness.rules.seed(timeout_rule(harness.guild_id, 1));

    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.log_channel_id = Some(channel);
    harness.settings.seed(settings);

    let service = ModerationService::new(&harness.context);
    service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();

    let messages = harness.platform.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, channel);
    assert!(messages[0].1.contains("timeout"));
}

#[tokio::test]
async fn standing_reads_have_no_side_effects() {
    let harness = TestHarness::new();
    let member = harness.join_member();
    harness.rules.seed(timeout_rule(harness.guild_id, 1));

    let service = ModerationService::new(&harness.context);
    service
        .submit_record(warning(&harness, member, harness.owner_id, 1))
        .await
        .unwrap();
    let fired_once = harness.platform.timeout_count();

    let first = service.member_standing(harness.guild_id, member).await.unwrap();
    let second = service.member_standing(harness.guild_id, member).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.platform.timeout_count(), fired_once);
    assert_eq!(harness.records.count_for(harness.guild_id, member), 1);
}

#[tokio::test]
async fn rule_upsert_replaces_in_place_and_owner_only() {
    let harness = TestHarness::new();
    let stranger = harness.join_member();
    let service = EscalationService::new(&harness.context);

    let kick = EscalationRule::new(
        harness.guild_id,
        RecordKind::Warning,
        5,
        EscalationAction::Kick,
        None,
        None,
    )
    .unwrap();
    service.upsert_rule(harness.owner_id, kick).await.unwrap();

    let ban = EscalationRule::new(
        harness.guild_id,
        RecordKind::Warning,
        5,
        EscalationAction::Ban,
        None,
        None,
    )
    .unwrap();
    service.upsert_rule(harness.owner_id, ban).await.unwrap();

    let rules = service.list_rules(harness.guild_id).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].action, EscalationAction::Ban);

    let denied = EscalationRule::new(
        harness.guild_id,
        RecordKind::Warning,
        9,
        EscalationAction::Kick,
        None,
        None,
    )
    .unwrap();
    let err = service.upsert_rule(stranger, denied).await.unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));
}

#[tokio::test]
async fn deleting_missing_rule_errors() {
    let harness = TestHarness::new();
    let service = EscalationService::new(&harness.context);

    let err = service
        .delete_rule(harness.owner_id, harness.guild_id, RecordKind::Warning, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(_)));
}

#[tokio::test]
async fn settings_changes_are_owner_or_developer_only() {
    let harness = TestHarness::new();
    let stranger = harness.join_member();
    let service = SettingsService::new(&harness.context);

    let err = service
        .set_offset_enabled(stranger, harness.guild_id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));

    let settings = service
        .set_offset_enabled(harness.owner_id, harness.guild_id, true)
        .await
        .unwrap();
    assert!(settings.offset_enabled);

    // The developer passes the gate without being the owner.
    let admin = integration_tests::unique_id();
    let settings = service
        .add_admin(harness.developer_id, harness.guild_id, admin)
        .await
        .unwrap();
    assert!(settings.admin_ids.contains(&admin));

    // Re-adding the same id leaves a single entry.
    let settings = service
        .add_admin(harness.owner_id, harness.guild_id, admin)
        .await
        .unwrap();
    assert_eq!(
        settings.admin_ids.iter().filter(|id| **id == admin).count(),
        1
    );

    let settings = service
        .remove_admin(harness.owner_id, harness.guild_id, admin)
        .await
        .unwrap();
    assert!(settings.admin_ids.is_empty());
}

#[tokio::test]
async fn announcements_deliver_to_every_configured_guild() {
    let harness = TestHarness::new();
    let channel_a = integration_tests::unique_id();
    let channel_b = integration_tests::unique_id();

    let mut settings_a = GuildSettings::defaults(harness.guild_id);
    settings_a.log_channel_id = Some(channel_a);
    harness.settings.seed(settings_a);
    let mut settings_b = GuildSettings::defaults(integration_tests::unique_id());
    settings_b.log_channel_id = Some(channel_b);
    harness.settings.seed(settings_b);

    let service = AnnouncementService::new(&harness.context);
    let id = service
        .schedule(
            harness.developer_id,
            "maintenance at noon".to_string(),
            Utc::now() - chrono::Duration::seconds(1),
        )
        .await
        .unwrap();

    let delivered = service.deliver_due(Utc::now()).await.unwrap();
    assert_eq!(delivered, 1);
    assert_eq!(harness.platform.message_count(), 2);
    assert_eq!(
        harness.announcements.status_of(id),
        Some(warden_core::AnnouncementStatus::Sent)
    );
}

#[tokio::test]
async fn announcement_scheduling_is_developer_only() {
    let harness = TestHarness::new();
    let service = AnnouncementService::new(&harness.context);

    let err = service
        .schedule(harness.owner_id, "hi".to_string(), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { .. }));
}

#[tokio::test]
async fn future_announcements_stay_pending() {
    let harness = TestHarness::new();
    let service = AnnouncementService::new(&harness.context);

    let id = service
        .schedule(
            harness.developer_id,
            "later".to_string(),
            Utc::now() + chrono::Duration::hours(1),
        )
        .await
        .unwrap();

    let delivered = service.deliver_due(Utc::now()).await.unwrap();
    assert_eq!(delivered, 0);
    assert_eq!(
        harness.announcements.status_of(id),
        Some(warden_core::AnnouncementStatus::Pending)
    );
}

#[tokio::test]
async fn announcement_failing_everywhere_is_marked_failed() {
    let harness = TestHarness::new();
    let mut settings = GuildSettings::defaults(harness.guild_id);
    settings.log_channel_id = Some(integration_tests::unique_id());
    harness.settings.seed(settings);

    let service = AnnouncementService::new(&harness.context);
    let id = service
        .schedule(
            harness.developer_id,
            "will not arrive".to_string(),
            Utc::now() - chrono::Duration::seconds(1),
        )
        .await
        .unwrap();

    harness.platform.set_fail_all(true);
    service.deliver_due(Utc::now()).await.unwrap();

    assert_eq!(
        harness.announcements.status_of(id),
        Some(warden_core::AnnouncementStatus::Failed)
    );
}

#[tokio::test]
async fn poller_interval_configuration_is_respected() {
    // Smoke check that the poller can be spawned and aborted cleanly.
    let harness = TestHarness::new();
    let handle = tokio::spawn(warden_service::run_announcement_poller(
        harness.context.clone(),
        Duration::from_millis(10),
    ));
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
}
