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
use membership::cuckoo_filter::CuckooFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a cuckoo filter configured for about 10k elements.
    let mut filter = CuckooFilter::<str>::new(10_000, 0.01)?;

    // Insert a few keys.
    for user in ["alice", "bob", "charlie"] {
        let added = filter.add(user);
        println!("add {user:>7}: {added}");
    }

    println!("contains alice: {}", filter.contains("alice"));
    println!("contains david: {}", filter.contains("david"));

    // Cuckoo filters support deletion.
    println!("remove bob: {}", filter.remove("bob"));
    println!("contains bob after remove: {}", filter.contains("bob"));

    // Filters of identical shape support multiset operations.
    let mut other = CuckooFilter::<str>::new(10_000, 0.01)?;
    other.add("david");
    filter.merge(&other)?;
    println!("contains david after merge: {}", filter.contains("david"));

    // And a stable wire format.
    let mut bytes = Vec::new();
    filter.write_to(&mut bytes)?;
    let restored = CuckooFilter::<str>::read_from(&mut bytes.as_slice())?;
    println!("round trip equal: {}", restored == filter);

    Ok(())
}
