//! Request construction for the generation service.

use crate::instruction::Instruction;
use crate::llm::types::Message;

/// Builds the message list for one question: the instruction followed by the question.
///
/// No earlier exchanges are included; every question stands alone.
pub fn build_messages(instruction: &Instruction, question: &str) -> Vec<Message> {
    vec![
        Message::system(instruction.text()),
        Message::user(question),
    ]
}
