use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const N_FEATURES: usize = 8;
const N_TRANSACTIONS: usize = 5000;
const FRAUD_RATE: f64 = 0.02;
const WINDOW_SECONDS: f64 = 48.0 * 3600.0;

/// Per-feature mean shift for fraudulent transactions.
const FRAUD_SHIFT: [f64; N_FEATURES] = [-2.4, 1.8, -3.1, 0.9, -1.2, 2.2, -0.6, 1.4];

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut times: Vec<f64> = Vec::with_capacity(N_TRANSACTIONS);
    let mut features: Vec<Vec<f64>> = vec![Vec::with_capacity(N_TRANSACTIONS); N_FEATURES];
    let mut amounts: Vec<f64> = Vec::with_capacity(N_TRANSACTIONS);
    let mut classes: Vec<i64> = Vec::with_capacity(N_TRANSACTIONS);

    let mut fraud_count = 0usize;

    for _ in 0..N_TRANSACTIONS {
        let is_fraud = rng.next_f64() < FRAUD_RATE;

        // Fraud clusters in the small hours; legitimate traffic is spread
        // over the whole window.
        let time = if is_fraud {
            let day = if rng.next_f64() < 0.5 { 0.0 } else { 86_400.0 };
            day + rng.next_f64() * 6.0 * 3600.0
        } else {
            rng.next_f64() * WINDOW_SECONDS
        };

        for (i, column) in features.iter_mut().enumerate() {
            let mean = if is_fraud { FRAUD_SHIFT[i] } else { 0.0 };
            column.push(rng.gauss(mean, 1.0));
        }

        let amount = if is_fraud {
            rng.gauss(4.2, 1.3).exp()
        } else {
            rng.gauss(3.1, 1.0).exp()
        };

        times.push(time);
        amounts.push(amount);
        classes.push(i64::from(is_fraud));
        fraud_count += usize::from(is_fraud);
    }

    // Build Arrow arrays
    let mut fields = vec![Field::new("Time", DataType::Float64, false)];
    let mut arrays: Vec<Arc<dyn arrow::array::Array>> =
        vec![Arc::new(Float64Array::from(times))];

    for (i, column) in features.into_iter().enumerate() {
        fields.push(Field::new(format!("V{}", i + 1), DataType::Float64, false));
        arrays.push(Arc::new(Float64Array::from(column)));
    }

    fields.push(Field::new("Amount", DataType::Float64, false));
    arrays.push(Arc::new(Float64Array::from(amounts)));
    fields.push(Field::new("Class", DataType::Int64, false));
    arrays.push(Arc::new(Int64Array::from(classes)));

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_transactions.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {N_TRANSACTIONS} transactions ({fraud_count} fraudulent, {N_FEATURES} features) to {output_path}"
    );
}
