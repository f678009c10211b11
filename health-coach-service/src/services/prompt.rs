use serde_json::Value;

const COACH_DIRECTIVE: &str = "Act as a health coach. Provide a detailed, motivational, \
and engaging analysis of the following health metrics. Use emojis, motivational quotes, \
and a friendly tone to connect with the user. Here are the metrics:";

/// Turn the caller's metrics into the instruction sent to the generator.
/// Any JSON value is accepted and appended in compact form.
pub fn build_prompt(inputs: &Value) -> String {
    format!("{}\n\n{}", COACH_DIRECTIVE, inputs)
}
