//! Store-driven tests of the full lead-capture flow
//!
//! These tests exercise the form the way the landing page does: a store over
//! the lead-form reducer, user intents sent as actions, and the submission
//! outcome observed through the action broadcast.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use cultiva_leadform::mocks::MockWebhookClient;
use cultiva_leadform::validate::{
    MSG_CROPS_REQUIRED, MSG_NAME_REQUIRED, MSG_PHONE_REQUIRED, MSG_REGION_REQUIRED,
};
use cultiva_leadform::{
    Field, FormPhase, LeadFormAction, LeadFormEnvironment, LeadFormReducer, LeadFormState,
    LeadSubmission, SubmissionOutcome, SubmitError,
};
use cultiva_runtime::Store;
use cultiva_testing::mocks::FixedClock;
use cultiva_testing::test_clock;
use std::time::Duration;

type FormStore = Store<
    LeadFormState,
    LeadFormAction,
    LeadFormEnvironment<FixedClock, MockWebhookClient>,
    LeadFormReducer<FixedClock, MockWebhookClient>,
>;

fn form_store(webhook: MockWebhookClient) -> FormStore {
    let env = LeadFormEnvironment::new(test_clock(), webhook);
    Store::new(LeadFormState::default(), LeadFormReducer::new(), env)
}

async fn fill_valid(store: &FormStore) {
    for (field, value) in [
        (Field::Name, "Juan Pérez"),
        (Field::Region, "Santa Cruz"),
        (Field::Crops, "Papa, Maíz"),
        (Field::Phone, "70123456"),
    ] {
        let _ = store
            .send(LeadFormAction::FieldChanged {
                field,
                value: value.to_string(),
            })
            .await
            .unwrap();
    }
}

async fn submit_and_settle(store: &FormStore) {
    let mut handle = store.send(LeadFormAction::SubmitTapped).await.unwrap();
    handle.wait().await;
}

#[tokio::test]
async fn accepted_submission_resets_and_confirms() {
    cultiva_testing::init_tracing();

    let webhook = MockWebhookClient::new();
    let store = form_store(webhook.clone());
    let mut observed = store.subscribe_actions();

    fill_valid(&store).await;
    submit_and_settle(&store).await;

    // Exactly one request, carrying the exact payload
    assert_eq!(
        webhook.submissions(),
        vec![LeadSubmission {
            name: "Juan Pérez".to_string(),
            region: "Santa Cruz".to_string(),
            crops: "Papa, Maíz".to_string(),
            phone: "70123456".to_string(),
        }]
    );

    // Terminal state: confirmation view, fields cleared
    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.phase, FormPhase::Submitted);
    assert_eq!(state.fields, Default::default());
    assert!(state.errors.is_empty());

    // The shell observes the successful outcome exactly once
    let action = observed.recv().await.unwrap();
    assert_eq!(
        action,
        LeadFormAction::SubmissionFinished {
            outcome: SubmissionOutcome::Success,
        }
    );
    assert!(observed.try_recv().is_err());
}

#[tokio::test]
async fn failed_submission_keeps_values_and_stays_silent() {
    let webhook = MockWebhookClient::failing(SubmitError::Status { status: 500 });
    let store = form_store(webhook.clone());
    let mut observed = store.subscribe_actions();

    fill_valid(&store).await;
    submit_and_settle(&store).await;

    // Back to editing with nothing lost and nothing shown to the user
    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.fields.name, "Juan Pérez");
    assert_eq!(state.fields.region, "Santa Cruz");
    assert_eq!(state.fields.crops, "Papa, Maíz");
    assert_eq!(state.fields.phone, "70123456");
    assert!(state.errors.is_empty());

    // One request went out; no success was ever observed
    assert_eq!(webhook.submission_count(), 1);
    let action = observed.recv().await.unwrap();
    assert_eq!(
        action,
        LeadFormAction::SubmissionFinished {
            outcome: SubmissionOutcome::Failure(SubmitError::Status { status: 500 }),
        }
    );
    assert!(observed.try_recv().is_err());
}

#[tokio::test]
async fn empty_form_never_reaches_the_network() {
    let webhook = MockWebhookClient::new();
    let store = form_store(webhook.clone());
    let mut observed = store.subscribe_actions();

    submit_and_settle(&store).await;

    let state = store.state(std::clone::Clone::clone).await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.errors.len(), 4);
    assert_eq!(state.errors.message(Field::Name), Some(MSG_NAME_REQUIRED));
    assert_eq!(state.errors.message(Field::Region), Some(MSG_REGION_REQUIRED));
    assert_eq!(state.errors.message(Field::Crops), Some(MSG_CROPS_REQUIRED));
    assert_eq!(state.errors.message(Field::Phone), Some(MSG_PHONE_REQUIRED));

    assert_eq!(webhook.submission_count(), 0);
    assert!(observed.try_recv().is_err());
}

#[tokio::test]
async fn editing_a_rejected_field_clears_only_its_error() {
    let store = form_store(MockWebhookClient::new());

    submit_and_settle(&store).await;
    assert_eq!(store.state(|s| s.errors.len()).await, 4);

    let _ = store
        .send(LeadFormAction::FieldChanged {
            field: Field::Name,
            value: "Juan".to_string(),
        })
        .await
        .unwrap();

    let errors = store.state(|s| s.errors.clone()).await;
    assert_eq!(errors.len(), 3);
    assert!(!errors.contains(Field::Name));
    assert_eq!(errors.message(Field::Region), Some(MSG_REGION_REQUIRED));
    assert_eq!(errors.message(Field::Crops), Some(MSG_CROPS_REQUIRED));
    assert_eq!(errors.message(Field::Phone), Some(MSG_PHONE_REQUIRED));
}

#[tokio::test]
async fn resubmit_after_failure_goes_through() {
    let webhook = MockWebhookClient::failing(SubmitError::Transport("connection refused".to_string()));
    let store = form_store(webhook.clone());

    fill_valid(&store).await;
    submit_and_settle(&store).await;
    assert_eq!(store.state(|s| s.phase).await, FormPhase::Editing);

    // The webhook recovers; the user taps submit again with the kept values
    webhook.set_failure(None);
    submit_and_settle(&store).await;

    assert_eq!(store.state(|s| s.phase).await, FormPhase::Submitted);
    assert_eq!(webhook.submission_count(), 2);
    assert_eq!(webhook.submissions()[0], webhook.submissions()[1]);
}

#[tokio::test]
async fn shell_can_await_the_submission_outcome() {
    let store = form_store(MockWebhookClient::new());

    fill_valid(&store).await;

    let action = store
        .send_and_wait_for(
            LeadFormAction::SubmitTapped,
            |a| matches!(a, LeadFormAction::SubmissionFinished { .. }),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(
        action,
        LeadFormAction::SubmissionFinished {
            outcome: SubmissionOutcome::Success,
        }
    ));
}
