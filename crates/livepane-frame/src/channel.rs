use livepane_protocol::Message;

/// Link from the frame to the admin window that embeds it.
pub trait ParentChannel {
    /// Post a message to the parent. Returns `false` when there is no parent.
    fn post_to_parent(&mut self, message: &Message) -> bool;
}

/// Collects posted messages.
impl ParentChannel for Vec<Message> {
    fn post_to_parent(&mut self, message: &Message) -> bool {
        self.push(message.clone());
        true
    }
}
