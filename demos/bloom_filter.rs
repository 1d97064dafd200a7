// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
use membership::bloom_filter::BloomFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a bloom filter configured for about 10k elements.
    let mut filter = BloomFilter::<str>::new(10_000, 0.01)?;

    for user in ["alice", "bob", "charlie"] {
        filter.add(user);
    }

    println!("contains alice: {}", filter.contains("alice"));
    println!("contains david: {}", filter.contains("david"));
    println!("additions: {}", filter.len());
    println!("estimated fpp: {:.6}", filter.current_fpp());

    // Bloom filters union by bitwise OR.
    let mut other = BloomFilter::<str>::new(10_000, 0.01)?;
    other.add("david");
    filter.merge(&other)?;
    println!("contains david after merge: {}", filter.contains("david"));

    Ok(())
}
