use crate::calculator::EngineError;

/// Called synchronously from within the engine call that triggered it.
pub trait Presenter {
    fn operation_changed(&mut self, expression: &str);

    fn error(&mut self, error: &EngineError);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn operation_changed(&mut self, expression: &str) {
        (**self).operation_changed(expression);
    }

    fn error(&mut self, error: &EngineError) {
        (**self).error(error);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    OperationChanged(String),
    Error(EngineError),
}

#[derive(Debug, Default)]
pub struct Recorder {
    notifications: Vec<Notification>,
}

impl Recorder {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_expression(&self) -> Option<&str> {
        self.notifications.iter().rev().find_map(|n| match n {
            Notification::OperationChanged(expression) => Some(expression.as_str()),
            Notification::Error(_) => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = EngineError> + '_ {
        self.notifications.iter().filter_map(|n| match n {
            Notification::Error(error) => Some(*error),
            Notification::OperationChanged(_) => None,
        })
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Notification> {
        self.notifications.drain(..)
    }
}

impl Presenter for Recorder {
    fn operation_changed(&mut self, expression: &str) {
        self.notifications
            .push(Notification::OperationChanged(expression.to_owned()));
    }

    fn error(&mut self, error: &EngineError) {
        self.notifications.push(Notification::Error(*error));
    }
}
