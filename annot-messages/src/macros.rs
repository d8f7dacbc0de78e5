/// Build a message from a template with named variables.
///
/// ```
/// use annot_messages::{msg, MESSAGES};
/// let line = msg!(MESSAGES.resolve.summary, count = "2", profile = "default");
/// assert!(line.contains("2"));
/// ```
#[macro_export]
macro_rules! msg {
    ($template:expr) => {
        $crate::builder::MessageBuilder::new($template).build()
    };
    ($template:expr, $($key:ident = $value:expr),+ $(,)?) => {
        {
            let mut builder = $crate::builder::MessageBuilder::new($template);
            $(
                builder = builder.var(stringify!($key), $value);
            )+
            builder.build()
        }
    };
}
