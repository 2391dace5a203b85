//! Validation stage placed in front of write handlers.

use super::{Handler, HandlerError, HandlerResult, Request};
use crate::repo::unit_of_work::UnitOfWork;
use crate::validation::Validator;
use log::warn;
use std::any::type_name;

/// Runs `validator` before `handler`; a rejected request never reaches it.
pub struct ValidationPipeline<V, H> {
    validator: V,
    handler: H,
}

impl<V, H> ValidationPipeline<V, H> {
    pub fn new(validator: V, handler: H) -> Self {
        Self { validator, handler }
    }
}

impl<R, V, H> Handler<R> for ValidationPipeline<V, H>
where
    R: Request,
    V: Validator<R>,
    H: Handler<R>,
{
    fn handle(&self, uow: &mut UnitOfWork, request: R) -> HandlerResult<R::Output> {
        if let Err(errors) = self.validator.validate(&request) {
            warn!(
                "event=validation module=pipeline status=rejected request={} failures={}",
                type_name::<R>(),
                errors.len()
            );
            return Err(HandlerError::Validation(errors));
        }
        self.handler.handle(uow, request)
    }
}
