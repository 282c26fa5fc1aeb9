use crate::api::{ApiError, Backend, Rule, RuleDraft};
use crate::session::Session;

impl Session {
    pub fn refresh_rules(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let mut rules = backend.fetch_rules()?;
        rules.sort_by_key(|r| r.display_order);
        self.rules = rules;
        Ok(())
    }

    /// Validation problems are reported without a request
    pub fn create_rule(&mut self, draft: RuleDraft, backend: &dyn Backend) -> Result<Rule, ApiError> {
        if let Err(e) = draft.validate() {
            return Err(self.report(e));
        }
        match backend.create_rule(&draft) {
            Ok(rule) => {
                tracing::info!(id = %rule.id, name = %rule.name, "Created rule");
                self.toasts.success(format!("Created rule \"{}\"", rule.name));
                self.rules.push(rule.clone());
                Ok(rule)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn update_rule(
        &mut self,
        id: &str,
        draft: RuleDraft,
        backend: &dyn Backend,
    ) -> Result<Rule, ApiError> {
        if let Err(e) = draft.validate() {
            return Err(self.report(e));
        }
        match backend.update_rule(id, &draft) {
            Ok(rule) => {
                match self.rules.iter_mut().find(|r| r.id == rule.id) {
                    Some(slot) => *slot = rule.clone(),
                    None => self.rules.push(rule.clone()),
                }
                Ok(rule)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn delete_rule(&mut self, id: &str, backend: &dyn Backend) -> Result<(), ApiError> {
        if let Err(e) = backend.delete_rule(id) {
            return Err(self.report(e));
        }
        self.rules.retain(|r| r.id != id);
        Ok(())
    }
}
