use super::*;

use crate::{drift, generator};

impl Dashboard {
    /// Arms the scheduler if the snapshot can feed the generator.
    ///
    /// An empty template or user pool is a configuration error: the
    /// simulation is left paused and the rest of the dashboard keeps working.
    pub fn start_simulation(&mut self) -> Result<(), DashboardError> {
        if let Err(violation) = self.snapshot.validate_pools() {
            let was_running = self.scheduler.is_running();
            self.scheduler.pause();
            if was_running {
                self.record(DashboardChange::SimulationStatusChanged(self.status()));
            }
            tracing::warn!(
                dashboard_id = %self.config.dashboard_id,
                error = %violation,
                "simulation disabled"
            );
            return Err(violation.into());
        }

        if let Some(fire) = self.scheduler.start(self.now_ms, &mut self.rng) {
            tracing::debug!(due_at_ms = fire.due_at_ms, "simulation armed");
            self.record(DashboardChange::SimulationStatusChanged(self.status()));
        }
        Ok(())
    }

    pub fn pause_simulation(&mut self) -> SimulationMode {
        let was_running = self.scheduler.is_running();
        let cancelled = self.scheduler.pause();
        if was_running {
            tracing::info!(
                now_ms = self.now_ms,
                cancelled = ?cancelled.map(|handle| handle.id()),
                "simulation paused"
            );
            self.record(DashboardChange::SimulationStatusChanged(self.status()));
        }
        self.scheduler.mode()
    }

    pub fn resume_simulation(&mut self) -> Result<SimulationMode, DashboardError> {
        self.snapshot.validate_pools()?;
        if !self.scheduler.is_running() {
            self.scheduler.resume(self.now_ms, &mut self.rng);
            tracing::info!(
                now_ms = self.now_ms,
                next_fire_at_ms = ?self.scheduler.next_fire_at(),
                "simulation resumed"
            );
            self.record(DashboardChange::SimulationStatusChanged(self.status()));
        }
        Ok(self.scheduler.mode())
    }

    /// The pause/resume button.
    pub fn toggle_simulation(&mut self) -> Result<SimulationMode, DashboardError> {
        match self.scheduler.mode() {
            SimulationMode::Running => Ok(self.pause_simulation()),
            SimulationMode::Paused => self.resume_simulation(),
        }
    }

    /// Moves the virtual clock to `now_ms`, running every fire and
    /// notification transition that falls due, in time order. Notification
    /// transitions due at the same instant as a fire run first.
    pub fn advance_to(&mut self, now_ms: u64) -> Result<AdvanceReport, DashboardError> {
        if now_ms < self.now_ms {
            return Err(DashboardError::ClockRewind {
                now_ms: self.now_ms,
                requested_ms: now_ms,
            });
        }

        let mut report = AdvanceReport::default();
        loop {
            let next_fire = self.scheduler.next_fire_at().filter(|at| *at <= now_ms);
            let next_transition = self.notifications.next_deadline().filter(|at| *at <= now_ms);

            match (next_fire, next_transition) {
                (None, None) => break,
                (Some(fire_at), Some(transition_at)) if fire_at < transition_at => {
                    self.now_ms = fire_at;
                    self.fire()?;
                    report.fires += 1;
                }
                (Some(fire_at), None) => {
                    self.now_ms = fire_at;
                    self.fire()?;
                    report.fires += 1;
                }
                (_, Some(transition_at)) => {
                    self.now_ms = transition_at;
                    let transitions = self.notifications.advance(transition_at);
                    report.notification_transitions += self.record_transitions(transitions);
                }
            }
        }

        self.now_ms = now_ms;
        Ok(report)
    }

    pub fn advance_by(&mut self, elapsed_ms: u64) -> Result<AdvanceReport, DashboardError> {
        self.advance_to(self.now_ms.saturating_add(elapsed_ms))
    }

    /// One scheduler fire: generate, insert, drift, re-arm.
    fn fire(&mut self) -> Result<(), DashboardError> {
        let Some(fire) = self.scheduler.take_due(self.now_ms) else {
            return Ok(());
        };

        let sequence = self.next_event_sequence.saturating_add(1);
        let generated = generator::generate(
            &self.snapshot.activity_templates,
            &self.snapshot.users,
            &mut self.rng,
            sequence,
            self.now_ms,
        );
        let event = match generated {
            Ok(event) => event,
            Err(violation) => {
                self.scheduler.pause();
                self.record(DashboardChange::SimulationStatusChanged(self.status()));
                return Err(violation.into());
            }
        };
        self.next_event_sequence = sequence;
        tracing::debug!(
            handle = fire.handle.id(),
            at_ms = fire.due_at_ms,
            kind = ?event.kind,
            text = %event.text,
            "simulation fire"
        );
        self.insert_event(event);

        let metrics = drift::tick(&self.snapshot.metrics, &mut self.rng);
        self.snapshot.metrics = metrics;
        self.record(DashboardChange::MetricsUpdated {
            metrics,
            display: metrics_display(&metrics),
        });

        self.scheduler.complete(fire, &mut self.rng);
        Ok(())
    }
}
