//! Fixed prompt text for both providers.

/// Forensic analysis prompt sent with the uploaded video. Demands a
/// structured report: per-entity tracking, a timestamped event log, flagged
/// behavior, scene description, and a closing narrative summary.
pub const ANALYSIS_PROMPT: &str = r#"You are a highly detailed visual understanding and forensic analysis agent. Your task is to provide a minute-by-minute, comprehensive log of all events and objects present in the video.

Follow these instructions precisely:

1.  **Detailed Object and Person Tracking**: For every distinct object and person that appears in the video, note its entry timestamp, exit timestamp, and a brief description of its appearance.
    * **Format**: 'Object ID: [ID], Appearance: [Description], Enters: [timestamp], Exits: [timestamp].'

2.  **Event Analysis**: Log every significant event or interaction that occurs, no matter how small. For each event, provide a timestamp and a detailed description.
    * **Format**: 'At [timestamp], [Detailed event description].'

3.  **Action and Violation Identification**: Identify all actions, movements, and interactions, noting any potential guideline violations, safety concerns, or unusual behavior.
    * **Format**: 'At [timestamp], [Action or behavior]. Potential issue: [Violation or concern type].'

4.  **Scene and Environment Description**: Provide a thorough description of the video's setting and changes in the environment over time. This includes weather, time of day, lighting, and any notable features of the location.

5.  **Final Comprehensive Summary**: Conclude with a detailed, narrative summary of the entire video, combining all the logged information into a cohesive and chronological report.

Your final output should be structured as a comprehensive report, not just a simple list. Break it down into clear sections for **Object Tracking**, **Event Log**, **Scene Description**, and **Final Summary**."#;

/// Prefix applied when a summarization failure becomes the artifact text.
pub const ERROR_MARKER: &str = "An error occurred: ";

/// Assistant turn recorded when the chat provider is unreachable.
pub const CHAT_APOLOGY: &str =
    "Sorry, I am unable to reach the chat service at the moment. Please try again later.";

/// System instruction for a chat turn, embedding the current summary verbatim.
pub fn system_instruction(summary: &str) -> String {
    format!(
        "You are a helpful and detailed assistant. You have been provided with a summary of a video. \
         Your task is to answer user questions based on the video summary and the ongoing chat history. \
         Do not make up information that is not in the summary. If the information isn't available, state that. \
         Video Summary:\n{summary}"
    )
}
