use tabq::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    env::Environment,
    gym::Corridor,
};

const NUM_EPISODES: u32 = 2000;
const REPORT_EVERY: u32 = 200;

fn main() {
    let mut env = Corridor::new(12, 200);
    let config = QTableAgentConfig {
        num_episodes: NUM_EPISODES,
        explore_start: 1.0,
        explore_end: 0.01,
        alpha: 0.5,
        gamma: 0.95,
    };
    let mut agent =
        QTableAgent::with_seed(env.num_states(), env.num_actions(), config, 42).unwrap();

    for i in 1..=NUM_EPISODES {
        agent.go(&mut env).unwrap();
        if i % REPORT_EVERY == 0 {
            let figures = env
                .report
                .take()
                .into_iter()
                .map(|(k, v)| format!("{k}/ep {:.2}", v / REPORT_EVERY as f64))
                .collect::<Vec<_>>()
                .join("  ");
            println!("episode {i:>5}  epsilon {:.3}  {figures}", agent.epsilon());
        }
    }

    println!("\n{}", agent.summary());
    println!(
        "best run: {} steps {:?}",
        agent.stats().best_run().len(),
        agent.stats().best_run()
    );
}
