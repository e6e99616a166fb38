//! Prompts for ABA session note drafting.
//!
//! The hosted backend gets the full clinical template in its system message;
//! the local backend gets a short completion-style prompt.

use crate::request::NoteContext;

/// Placeholder for context values the caller did not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Structured clinical note the model is asked to fill in.
pub const NOTE_TEMPLATE: &str = r#"**Client Information**
- Name: [Name], DOB: [MM/DD/YYYY], Insurance: [Name], Diagnosis: [ICD Code]
- Session Date/Time: [Date], [Start–End], Location: [Home/Clinic/School]
- Clinician: [Name], Credentials; Units: [X × 15‑min]

**Goals/Targets**
- Goal A: description of target, baseline vs. expected performance
- Goal B: …

**Interventions Implemented**
- Intervention A: taught via [DTT/NET/etc.], prompting level [full/partial], reinforcement [type].
- Intervention B: …

**Client Response & Observations**
- For Goal A: ran X trials; client responded correctly Y% of time; error correction applied as needed.
- For Goal B: …

**Behavioral Events**
- Behavior X occurred [when? antecedent]; RBT responded using [strategy]; replacement behaviors observed: [description].

**Data Summary**
- Goal-wise performance table or bullet:
  - Goal A: X trials, Y correct (Y%)…
  - Behavior incidents: frequency/duration…

**Plan for Next Session**
- Suggested adjustments: e.g. increase complexity, fade prompts, change reinforcement.
- New target programming suggestions: …"#;

/// Section headings of [`NOTE_TEMPLATE`], in order.
pub const TEMPLATE_SECTIONS: &[&str] = &[
    "Client Information",
    "Goals/Targets",
    "Interventions Implemented",
    "Client Response & Observations",
    "Behavioral Events",
    "Data Summary",
    "Plan for Next Session",
];

/// Render the session context block. No context, or an empty one, renders as
/// an empty string; a context with missing keys renders them as
/// [`NOT_AVAILABLE`].
pub fn render_context(context: Option<&NoteContext>) -> String {
    let Some(context) = context.filter(|context| **context != NoteContext::default()) else {
        return String::new();
    };
    let value = |field: &Option<String>| field.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    format!(
        "Client Name: {}\n\
         Date of Birth: {}\n\
         ICD Code/Diagnosis: {}\n\
         Session Date: {}\n\
         Session Time: {}\n\
         Session Duration: {} minutes\n\
         Location: {}\n\
         Clinician: {}\n\
         Clinic: {}\n\
         Goals/Targets: {}",
        value(&context.client_name),
        value(&context.client_dob),
        value(&context.client_icd),
        value(&context.session_date),
        value(&context.session_time),
        value(&context.session_duration),
        value(&context.session_location),
        value(&context.clinician),
        value(&context.clinic),
        value(&context.goals),
    )
}

/// System message for the hosted chat backend.
pub fn system_prompt(context: &str) -> String {
    format!(
        r#"You are an expert ABA (Applied Behavior Analysis) therapist assistant.
Generate professional session notes based on the observations provided.

Use this EXACT template structure for the notes and fill in the sections with the provided session data:
{}

Instructions for filling the template:
- Replace all placeholders in [brackets] with actual session data
- If specific information is not available, use "Not provided" or "N/A"
- Maintain the exact formatting and structure of the template
- Include all sections even if some data is missing
- Be professional and clinical in tone

Additional context: {}"#,
        NOTE_TEMPLATE, context
    )
}

/// User message for the hosted chat backend.
pub fn user_prompt(observations: &str) -> String {
    format!(
        "Generate ABA session notes using the template structure. \
         Fill in the template with this session data: {}",
        observations
    )
}

/// Completion prompt for the local backend.
pub fn local_prompt(observations: &str, context: &str) -> String {
    format!(
        "Context: {}\n\nObservations: {}\n\nGenerate ABA session notes:",
        context, observations
    )
}
