//! Synthetic activity generation from templates and the user pool.

use contracts::{ActivityEvent, ActivityKind, PreconditionViolation, UserRecord, GENERATED_EVENT_TIME};

use crate::rng::RandomSource;
use crate::template;

pub const AMOUNT_MIN: u64 = 100;
pub const AMOUNT_SPAN: u64 = 5_000;

/// Kind of event a template produces, decided from the template text alone.
pub fn classify_template(template: &str) -> ActivityKind {
    if template.contains("Payment") {
        ActivityKind::Payment
    } else if template.contains("User") {
        ActivityKind::User
    } else {
        ActivityKind::System
    }
}

/// Builds one activity event.
///
/// Draws, in order: a template, a user, and an amount in `[100, 5099]`.
/// Missing user columns substitute as empty text.
pub fn generate(
    templates: &[String],
    users: &[UserRecord],
    rng: &mut impl RandomSource,
    sequence: u64,
    now_ms: u64,
) -> Result<ActivityEvent, PreconditionViolation> {
    if templates.is_empty() {
        return Err(PreconditionViolation::EmptyTemplatePool);
    }
    if users.is_empty() {
        return Err(PreconditionViolation::EmptyUserPool);
    }

    let template = &templates[rng.pick_index(templates.len())];
    let user = &users[rng.pick_index(users.len())];
    let amount = rng.floor_scaled(AMOUNT_SPAN) + AMOUNT_MIN;

    let text = template::render(
        template,
        &[
            ("name", user.name.clone().unwrap_or_default()),
            ("role", user.role.clone().unwrap_or_default()),
            ("amount", amount.to_string()),
        ],
    );

    Ok(ActivityEvent {
        sequence,
        text,
        time: GENERATED_EVENT_TIME.to_string(),
        kind: classify_template(template),
        emitted_at_ms: now_ms,
    })
}
